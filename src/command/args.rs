use super::CommandError;

/// Reduce the arguments of `down` to a step count and a confirmation flag.
///
/// Returns `(count, needs_confirmation)` where `-1` means every applied
/// migration. A bare `down` reverts everything but must be confirmed first;
/// `--all` or an explicit count skips confirmation.
pub fn num_down_migrations_from_args(
    apply_all: bool,
    args: &[String],
) -> Result<(i64, bool), CommandError> {
    if apply_all {
        if !args.is_empty() {
            return Err(CommandError::ConflictingFlags(
                "-all cannot be used with other arguments".to_string(),
            ));
        }
        return Ok((-1, false));
    }

    match args {
        [] => Ok((-1, true)),
        [value] => parse_limit(value).map(|n| (n, false)),
        _ => Err(CommandError::TooManyArguments),
    }
}

/// Parse a non-negative decimal step count. Signs are not accepted.
fn parse_limit(value: &str) -> Result<i64, CommandError> {
    let invalid = || CommandError::NonNumericArgument(value.to_string());

    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let n: u64 = value.parse().map_err(|_| invalid())?;
    i64::try_from(n).map_err(|_| invalid())
}
