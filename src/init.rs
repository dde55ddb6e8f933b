use std::io::{stdin, stdout, BufRead, Write};

use anyhow::{anyhow, Result};

use crate::settings::Settings;
use crate::storage::{self, FileStorage, User, UserType};

fn to_user(email: &str, role: &str) -> Result<User> {
    let email = email.trim();
    if email.is_empty() {
        return Err(anyhow!("email must not be empty"));
    }

    if !email.contains('@') {
        return Err(anyhow!("{} is not an email address", email));
    }

    let ty = match role.trim().to_lowercase().as_str() {
        "employee" => UserType::Employee,
        "admin" => UserType::Admin,
        _ => return Err(anyhow!("role must be one of EMPLOYEE or ADMIN")),
    };

    Ok(User {
        ty,
        email: Some(email.to_string()),
    })
}

fn prompt<R: BufRead>(input: &mut R, label: &str) -> Result<String> {
    print!("{}: ", label);
    stdout().flush()?;

    let mut buf = String::new();
    input.read_line(&mut buf)?;
    Ok(buf.trim().to_string())
}

pub(crate) fn run(settings: Settings) -> Result<()> {
    let stdin = stdin();
    let mut input = stdin.lock();

    let email = prompt(&mut input, "Email")?;
    let role = prompt(&mut input, "Role <EMPLOYEE | ADMIN>")?;
    let user = to_user(&email, &role)?;

    let storage = FileStorage::open(&settings.data_file)?;
    storage::set_user(&storage, &user)?;
    println!("Session stored in {}.", settings.data_file);

    Ok(())
}
