use crate::ui::{theme, Icons};
use owo_colors::OwoColorize;

pub fn header(text: &str) {
    println!("{}", text.style(theme().header.clone()));
}

pub fn section(icon: &str, title: &str) {
    println!("{} {}", icon, title.style(theme().header.clone()));
}

pub fn success(label: &str) {
    println!("{} {}", Icons::CHECK, label.style(theme().success.clone()));
}
