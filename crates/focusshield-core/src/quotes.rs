//! Motivational quotes shown on the block overlay.

use rand::Rng;

pub const QUOTES: [&str; 10] = [
    "The way to get started is to quit talking and begin doing. - Walt Disney",
    "Don't let yesterday take up too much of today. - Will Rogers",
    "If you are working on something that you really care about, you don't have to be pushed. The vision pulls you. - Steve Jobs",
    "Believe you can and you're halfway there. - Theodore Roosevelt",
    "The only impossible journey is the one you never begin. - Tony Robbins",
    "Focus on being productive instead of busy. - Tim Ferriss",
    "You are never too old to set another goal or to dream a new dream. - C.S. Lewis",
    "The future depends on what you do today. - Mahatma Gandhi",
    "Success is not final, failure is not fatal: it is the courage to continue that counts. - Winston Churchill",
    "The only way to do great work is to love what you do. - Steve Jobs",
];

/// Uniform random pick from [`QUOTES`].
pub fn random_quote() -> &'static str {
    QUOTES[rand::thread_rng().gen_range(0..QUOTES.len())]
}
