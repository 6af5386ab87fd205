//! Multi-token consistency checks.
//!
//! A multi-OTP login asks the user for several consecutive OTPs from the same
//! device. After each is verified and its device timestamp recovered, the
//! tokens must come from one device, in order, within a time window.

use std::time::Duration;

use yubiotp_types::OtpToken;

use crate::VerifyError;

/// Device timestamp counters tick at 8 Hz.
pub const TICKS_PER_SECOND: u64 = 8;

/// Minimum number of tokens in a multi-token check.
pub const MIN_TOKENS: usize = 2;

/// Result of a passed time-window check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindowCheck {
    /// Counter ticks between the first and last token.
    pub delta_ticks: u64,
}

impl TimeWindowCheck {
    pub fn elapsed(&self) -> Duration {
        Duration::from_secs_f64(self.delta_ticks as f64 / TICKS_PER_SECOND as f64)
    }
}

/// Preconditions checked before any network access: at least two tokens,
/// all from one device.
pub fn check_token_set(tokens: &[OtpToken]) -> Result<(), VerifyError> {
    if tokens.len() < MIN_TOKENS {
        return Err(VerifyError::TooFewTokens {
            count: tokens.len(),
        });
    }
    let first = tokens[0].device_id();
    if let Some(other) = tokens.iter().find(|t| t.device_id() != first) {
        return Err(VerifyError::DeviceIdMismatch {
            first: first.to_string(),
            other: other.device_id().to_string(),
        });
    }
    Ok(())
}

/// Check that the last token was generated after the first, and no more than
/// `max_window` later. Every token must carry its recovered timestamp.
pub fn check_time_window(
    tokens: &[OtpToken],
    max_window: Duration,
) -> Result<TimeWindowCheck, VerifyError> {
    check_token_set(tokens)?;

    let timestamp_of = |otp: &OtpToken| {
        otp.timestamp()
            .ok_or_else(|| VerifyError::MissingTimestamp(otp.normalized().to_string()))
    };
    let first = timestamp_of(&tokens[0])?;
    let last = timestamp_of(&tokens[tokens.len() - 1])?;

    let delta_ticks = i128::from(last) - i128::from(first);
    if delta_ticks < 0 {
        return Err(VerifyError::NegativeDelta { delta_ticks });
    }

    let delta_secs = delta_ticks as f64 / TICKS_PER_SECOND as f64;
    let max_window_secs = max_window.as_secs_f64();
    if delta_secs > max_window_secs {
        return Err(VerifyError::TimeWindowExceeded {
            max_window_secs,
            delta_secs,
        });
    }

    Ok(TimeWindowCheck {
        delta_ticks: delta_ticks as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIRST: &str = "tlerefhcvijlngibueiiuhkeibbcbecehvjiklltnbbl";
    const SECOND: &str = "tlerefhcvijlngibueiiuhkeibbcbecehvjiklltnbbc";
    const BASE: u64 = 1383997754 * TICKS_PER_SECOND;

    fn stamped(otp: &str, ticks: u64) -> OtpToken {
        let mut token = OtpToken::new(otp);
        token.set_timestamp(ticks);
        token
    }

    #[test]
    fn single_token_rejected() {
        let err = check_token_set(&[OtpToken::new(FIRST)]).unwrap_err();
        assert!(matches!(err, VerifyError::TooFewTokens { count: 1 }));
        assert!(matches!(
            check_token_set(&[]),
            Err(VerifyError::TooFewTokens { count: 0 })
        ));
    }

    #[test]
    fn different_devices_rejected() {
        let tokens = [
            OtpToken::new(FIRST),
            OtpToken::new("blerefhcvijlngibueiiuhkeibbcbecehvjiklltnbbl"),
        ];
        let err = check_token_set(&tokens).unwrap_err();
        assert!(err.to_string().starts_with("OTPs contain different device ids"));
    }

    #[test]
    fn within_window() {
        let tokens = [stamped(FIRST, BASE), stamped(SECOND, BASE + 2 * TICKS_PER_SECOND)];
        let check = check_time_window(&tokens, Duration::from_secs(5)).unwrap();
        assert_eq!(check.delta_ticks, 16);
        assert_eq!(check.elapsed(), Duration::from_secs(2));
    }

    #[test]
    fn exactly_at_window_passes() {
        let tokens = [stamped(FIRST, BASE), stamped(SECOND, BASE + 5 * TICKS_PER_SECOND)];
        assert!(check_time_window(&tokens, Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn window_exceeded() {
        let tokens = [stamped(FIRST, BASE), stamped(SECOND, BASE + 8 * TICKS_PER_SECOND)];
        let err = check_time_window(&tokens, Duration::from_secs(7)).unwrap_err();
        assert!(matches!(err, VerifyError::TimeWindowExceeded { .. }));
        assert!(err.to_string().starts_with(
            "More than 7 seconds have passed between generating the first and the last OTP"
        ));
    }

    #[test]
    fn reversed_order() {
        let tokens = [stamped(FIRST, BASE + 8 * TICKS_PER_SECOND), stamped(SECOND, BASE)];
        let err = check_time_window(&tokens, Duration::from_secs(7)).unwrap_err();
        assert!(matches!(err, VerifyError::NegativeDelta { delta_ticks: -64 }));
        assert!(err.to_string().starts_with("delta is smaller than zero"));
    }

    #[test]
    fn missing_timestamp() {
        let tokens = [stamped(FIRST, BASE), OtpToken::new(SECOND)];
        assert!(matches!(
            check_time_window(&tokens, Duration::from_secs(5)),
            Err(VerifyError::MissingTimestamp(_))
        ));
    }
}
