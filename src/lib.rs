/*
 * Meeting Minutes CLI - Rust Edition
 * Copyright (c) 2024 Meeting Minutes Contributors
 *
 * This work is licensed under the Creative Commons Attribution-NonCommercial 4.0 International License.
 * To view a copy of this license, visit http://creativecommons.org/licenses/by-nc/4.0/
 *
 * You are free to share and adapt this work for non-commercial purposes with attribution.
 * Commercial use is prohibited without explicit written permission.
 *
 * For commercial licensing inquiries, please contact the project maintainers.
 */

pub mod agenda;
pub mod config;
pub mod export;
pub mod input;
pub mod minutes;
pub mod recognition;
pub mod session;
pub mod transcript;
pub mod types;
pub mod ui;
