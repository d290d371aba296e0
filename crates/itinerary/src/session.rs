/// Monotonic counter guarding against out-of-order fetch results.
///
/// Every scope switch, tab switch or content request calls [`Generation::next`]
/// and tags the request with the returned token. When the result arrives,
/// [`Generation::is_current`] tells whether the user has moved on since.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Generation {
    current: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl Generation {
    pub const fn new() -> Self {
        Self { current: 0 }
    }

    /// Invalidates every outstanding token and returns a fresh one.
    pub fn next(&mut self) -> RequestToken {
        self.current = self.current.wrapping_add(1);
        RequestToken(self.current)
    }

    pub const fn token(&self) -> RequestToken {
        RequestToken(self.current)
    }

    pub const fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.current
    }
}
