use std::env;

use dormbook::auth::password;

/// Prints an argon2 hash suitable for ADMIN_PASSWORD_HASH.
fn main() -> anyhow::Result<()> {
    let password = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: gen_hash <password>"))?;
    println!("{}", password::hash_password(&password)?);
    Ok(())
}
