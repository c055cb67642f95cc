use std::io::{self, BufRead, Write};

/// Ask a yes/no question; only `y` or `yes` (any case) counts as consent.
pub fn confirm<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> io::Result<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(matches!(answer.as_str(), "y" | "yes"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_confirm_accepts_yes() {
        let mut out = Vec::new();
        assert!(confirm("Proceed?", &mut Cursor::new("y\n"), &mut out).unwrap());
        assert!(confirm("Proceed?", &mut Cursor::new("YES\n"), &mut out).unwrap());
        assert_eq!(String::from_utf8(out).unwrap(), "Proceed? [y/N] Proceed? [y/N] ");
    }

    #[test]
    fn test_confirm_defaults_to_no() {
        let mut out = Vec::new();
        assert!(!confirm("Proceed?", &mut Cursor::new("\n"), &mut out).unwrap());
        assert!(!confirm("Proceed?", &mut Cursor::new(""), &mut out).unwrap());
        assert!(!confirm("Proceed?", &mut Cursor::new("nope\n"), &mut out).unwrap());
    }
}
