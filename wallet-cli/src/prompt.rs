use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use novawallet::wallet::PasswordPolicy;
use zeroize::Zeroizing;

/// Read a secret from the terminal without echo.
pub fn secret(prompt: &str) -> Result<Zeroizing<String>> {
    Ok(Zeroizing::new(rpassword::read_password_from_tty(Some(prompt))?))
}

/// Ask for a password once (for unlocking).
pub fn unlock_password() -> Result<Zeroizing<String>> {
    let password = secret("Password: ")?;
    PasswordPolicy::default().check_unlock(&password)?;
    Ok(password)
}

/// Ask for a new password twice and apply the password policy.
pub fn new_password() -> Result<Zeroizing<String>> {
    let password = secret("New password: ")?;
    let confirmation = secret("Confirm password: ")?;
    PasswordPolicy::default().check_new_confirmed(&password, &confirmation)?;
    Ok(password)
}

/// Yes/no question on stdin; anything but "y"/"yes" is a no.
pub fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer)? == 0 {
        bail!("no answer on stdin");
    }
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
