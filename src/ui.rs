// src/ui.rs

use crate::constants;
use colored::*;
use std::io::{self, Write};

pub fn print_header(title: &str) {
    println!("\n{}", "═".repeat(constants::UI_WIDTH));
    println!(" {}", title.cyan().bold());
    println!("{}", "═".repeat(constants::UI_WIDTH));
}

pub fn box_message(title: &str, content: &[&str], color_func: fn(ColoredString) -> ColoredString) {
    println!("\n┌{}┐", "─".repeat(constants::UI_WIDTH - 2));
    println!("  {}", color_func(title.bold()));
    println!("├{}┤", "─".repeat(constants::UI_WIDTH - 2));
    for line in content {
        println!("  {}", line);
    }
    println!("└{}┘", "─".repeat(constants::UI_WIDTH - 2));
}

/// Prints an in-progress fragment and keeps the cursor on the same line, so
/// the outcome ("done." / "failed.") can be appended once it is known.
pub fn step(message: &str) {
    print!("{}", message);
    let _ = io::stdout().flush();
}

fn read_input_line() -> io::Result<String> {
    let mut input = String::new();
    // A zero-byte read means stdin is closed; surface it as an error so the
    // retry loops built on prompts terminate instead of spinning.
    if io::stdin().read_line(&mut input)? == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
    }
    Ok(input.trim().to_string())
}

pub fn prompt(message: &str, default: Option<&str>) -> io::Result<String> {
    let default_str = default.map_or("".to_string(), |d| format!(" (default: {})", d));
    print!("\n>>> {}{}: ", message, default_str);
    io::stdout().flush()?;
    let input = read_input_line()?;
    if input.is_empty() {
        Ok(default.unwrap_or("").to_string())
    } else {
        Ok(input)
    }
}

pub fn prompt_hidden(message: &str) -> io::Result<String> {
    print!("\n>>> {}: ", message);
    io::stdout().flush()?;
    rpassword::read_password()
}

pub fn pause() {
    print!("\npress enter to exit... ");
    let _ = io::stdout().flush();
    let _ = io::stdin().read_line(&mut String::new());
}
