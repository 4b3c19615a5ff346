// tests/property/main.rs

mod tokenize;
