use std::env;

use chrono_tz::Tz;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// IANA timezone of the facility. Recurring rules are expressed in local
    /// wall-clock time and converted to UTC per occurrence.
    pub facility_timezone: Tz,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            port: env::var("PORT").unwrap_or_else(|_| "3000".to_string()).parse().expect("PORT must be a number"),
            facility_timezone: env::var("FACILITY_TIMEZONE")
                .unwrap_or_else(|_| "UTC".to_string())
                .parse()
                .expect("FACILITY_TIMEZONE must be a valid IANA timezone"),
        }
    }
}
