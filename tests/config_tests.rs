use chrono::{Duration, NaiveDate, Weekday};
use obligation_core::{
    config::{ForecastConfig, SchedulerConfig},
    currency::CurrencyCode,
    ConfigManager, EngineConfig, ForecastRequest, Forecaster, HistoricalTransaction, PacePolicy,
};
use rust_decimal::Decimal;
use tempfile::tempdir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn missing_file_loads_defaults() {
    let temp = tempdir().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().join("settings")).unwrap();
    let config = manager.load().expect("defaults");
    assert_eq!(config, EngineConfig::default());
    assert!(!manager.config_path().exists());
}

#[test]
fn saved_config_loads_back() {
    let temp = tempdir().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    let config = EngineConfig {
        currency: CurrencyCode::new("jpy"),
        scheduler: SchedulerConfig {
            week_start: Weekday::Mon,
        },
        forecast: ForecastConfig {
            pace_policy: PacePolicy::CalendarMonth,
            default_horizon_days: 60,
        },
    };
    manager.save(&config).expect("save config");

    assert!(manager.config_path().exists());
    assert!(!manager.config_path().with_extension("json.tmp").exists());
    let loaded = manager.load().expect("load config");
    assert_eq!(loaded, config);
    assert_eq!(loaded.currency.as_str(), "JPY");
}

#[test]
fn hand_written_file_is_accepted() {
    let temp = tempdir().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    std::fs::write(
        manager.config_path(),
        r#"{
            "currency": "EUR",
            "forecast": { "pace_policy": { "trailing_days": 14 } }
        }"#,
    )
    .unwrap();
    let config = manager.load().unwrap();
    assert_eq!(config.forecast.pace_policy, PacePolicy::TrailingDays(14));
    assert_eq!(config.forecast.default_horizon_days, 30);
    assert_eq!(config.scheduler.week_start, Weekday::Sun);
}

#[test]
fn configuration_drives_the_forecaster() {
    let today = date(2025, 3, 15);
    let history: Vec<HistoricalTransaction> = (0..28)
        .map(|offset| HistoricalTransaction::new(today - Duration::days(offset), Decimal::from(-10)))
        .collect();

    let config = EngineConfig {
        forecast: ForecastConfig {
            pace_policy: PacePolicy::CalendarMonth,
            default_horizon_days: 5,
        },
        ..EngineConfig::default()
    };
    let forecaster = Forecaster::new(&config);
    assert_eq!(forecaster.pace_policy(), PacePolicy::CalendarMonth);

    let request = ForecastRequest {
        starting_balance: Decimal::from(200),
        pace_override: None,
        horizon_days: None,
        today,
        obligations: &[],
        transactions: &history,
    };
    let run = forecaster.project(request).unwrap();
    // Feb 16 through Mar 15 is 28 days of 10 each.
    assert_eq!(run.daily_pace, Decimal::from(10));
    assert_eq!(run.len(), 6);
    assert_eq!(run.ending_balance(), Decimal::from(140));
}

#[test]
fn currency_precision_applies_to_output() {
    let today = date(2025, 3, 30);
    let history = vec![HistoricalTransaction::new(today, Decimal::from(-100))];
    let config = EngineConfig {
        currency: CurrencyCode::new("JPY"),
        ..EngineConfig::default()
    };
    let request = ForecastRequest {
        starting_balance: Decimal::from(50),
        pace_override: None,
        horizon_days: Some(1),
        today,
        obligations: &[],
        transactions: &history,
    };
    let run = Forecaster::new(&config).project(request).unwrap();
    assert_eq!(run.entries[0].balance, Decimal::from(47));
    assert_eq!(run.entries[1].balance, Decimal::from(43));
}

#[test]
fn lowercase_currency_in_file_rounds_at_its_precision() {
    let temp = tempdir().unwrap();
    let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
    std::fs::write(manager.config_path(), r#"{ "currency": "jpy" }"#).unwrap();
    let config = manager.load().unwrap();
    assert_eq!(config.currency, CurrencyCode::new("JPY"));
    assert_eq!(config.currency.minor_units(), 0);

    let today = date(2025, 3, 30);
    let history = vec![HistoricalTransaction::new(today, Decimal::from(-100))];
    let request = ForecastRequest {
        starting_balance: Decimal::from(50),
        pace_override: None,
        horizon_days: Some(1),
        today,
        obligations: &[],
        transactions: &history,
    };
    let run = Forecaster::new(&config).project(request).unwrap();
    assert_eq!(run.entries[0].balance, Decimal::from(47));
}
