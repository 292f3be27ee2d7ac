// src/handlers/mod.rs

pub mod answer_key;
pub mod health;
pub mod questionnaire;
pub mod registration;
