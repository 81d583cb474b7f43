use std::time::SystemTime;

use crate::{hotp::Hotp, OtpCode, OtpError, OtpHashAlgorithm};

/// Source of the current time in seconds since the UNIX epoch.
pub trait Clock {
    fn now(&self) -> u64;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // A clock set before 1970 reads as the epoch itself
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }
}

/// A clock pinned to a single instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0
    }
}

/// A generated code together with how long it stays valid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TotpReading {
    pub code: OtpCode,
    pub seconds_remaining: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Totp {
    pub(crate) secret: String,
    pub(crate) algorithm: OtpHashAlgorithm,
    pub(crate) period: u64,
    pub(crate) digits: u32,
}

impl Totp {
    /// Creates the config for the [Time-based One-time Password Algorithm](http://en.wikipedia.org/wiki/Time-based_One-time_Password_Algorithm)
    /// (TOTP) given an RFC4648 base32 encoded secret.
    ///
    /// Obs.: This method defaults to the SHA1 hash, a 6-digit code and a period of 30 seconds
    pub fn new(secret: String) -> Self {
        Self {
            secret,
            algorithm: OtpHashAlgorithm::SHA1,
            period: 30,
            digits: 6,
        }
    }

    /// Builds a default TOTP from a stored base32 secret value. The secret
    /// itself is only decoded when a code is generated.
    pub fn parse(value: &str) -> Self {
        Self::new(value.trim().to_string())
    }

    ///  Sets hashing algorithm
    pub fn with_algorithm(&mut self, algorithm: OtpHashAlgorithm) -> &mut Self {
        self.algorithm = algorithm;

        self
    }

    ///  Sets the period in seconds
    pub fn with_period(&mut self, period: u64) -> &mut Self {
        self.period = period;

        self
    }

    ///  Sets the number of digits to generate
    pub fn with_digits(&mut self, digits: u32) -> &mut Self {
        self.digits = digits;

        self
    }

    /// The time step counter for the given instant
    pub fn counter(&self, seconds_since_epoch: u64) -> Result<u64, OtpError> {
        if self.period == 0 {
            return Err(OtpError::InvalidPeriod);
        }

        Ok(seconds_since_epoch / self.period)
    }

    /// Generates a Totp from the provided seconds since the UNIX epoch
    /// truncated to the specified number of digits
    pub fn generate(&self, seconds_since_epoch: u64) -> Result<OtpCode, OtpError> {
        let counter = self.counter(seconds_since_epoch)?;

        let mut hotp = Hotp::new(self.secret.clone());
        hotp.with_algorithm(self.algorithm).with_digits(self.digits);

        hotp.generate(counter)
    }

    /// Seconds left before the code for the given instant rotates,
    /// always within `1..=period`
    pub fn remaining_seconds(&self, seconds_since_epoch: u64) -> u64 {
        if self.period == 0 {
            return 0;
        }

        self.period - (seconds_since_epoch % self.period)
    }

    pub fn reading(&self, seconds_since_epoch: u64) -> Result<TotpReading, OtpError> {
        Ok(TotpReading {
            code: self.generate(seconds_since_epoch)?,
            seconds_remaining: self.remaining_seconds(seconds_since_epoch),
        })
    }

    pub fn reading_now(&self, clock: &impl Clock) -> Result<TotpReading, OtpError> {
        self.reading(clock.now())
    }
}
