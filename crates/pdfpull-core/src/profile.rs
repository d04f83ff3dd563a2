//! Per-request header profile: rotated User-Agent plus static Accept headers.

use crate::jitter::RandomSource;

/// Desktop browser User-Agents rotated across requests.
pub const USER_AGENTS: [&str; 4] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0.0.0 Safari/537.3",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_3_1) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.1",
    "Mozilla/5.0 (Windows NT 10.0; rv:122.0) Gecko/20100101 Firefox/122.0",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.3",
];

pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Headers sent with one request. Chosen fresh for every request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderProfile {
    pub user_agent: &'static str,
    pub accept: &'static str,
    pub accept_language: &'static str,
}

impl HeaderProfile {
    /// `Name: value` lines in the form libcurl expects.
    pub fn header_lines(&self) -> [String; 3] {
        [
            format!("User-Agent: {}", self.user_agent),
            format!("Accept: {}", self.accept),
            format!("Accept-Language: {}", self.accept_language),
        ]
    }
}

/// Picks a User-Agent uniformly from [`USER_AGENTS`].
pub fn select_profile<R: RandomSource + ?Sized>(rng: &mut R) -> HeaderProfile {
    let index = rng.pick_index(USER_AGENTS.len()) % USER_AGENTS.len();
    HeaderProfile {
        user_agent: USER_AGENTS[index],
        accept: ACCEPT,
        accept_language: ACCEPT_LANGUAGE,
    }
}
