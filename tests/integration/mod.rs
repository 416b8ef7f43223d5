mod basic_integration;
mod persistence;
