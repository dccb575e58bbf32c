use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use obligation_core::{
    forecast::{events_from_obligations, forecast},
    required_income, Anchor, ForecastRequest, Forecaster, HistoricalTransaction, Obligation,
    RecurrenceFrequency, ReportingCadence, Scheduler,
};
use rust_decimal::Decimal;

fn build_obligations(count: usize) -> Vec<Obligation> {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let recurring: Vec<RecurrenceFrequency> = RecurrenceFrequency::ALL
        .into_iter()
        .filter(|frequency| frequency.is_recurring())
        .collect();

    (0..count)
        .map(|idx| {
            let frequency = recurring[idx % recurring.len()];
            let due = start + Duration::days((idx % 28) as i64);
            let amount = Decimal::new(2_500 + (idx % 100) as i64 * 37, 2);
            let obligation = if idx % 5 == 0 {
                Obligation::income(format!("Income {idx}"), amount, frequency, due)
            } else {
                Obligation::new(format!("Bill {idx}"), amount, frequency, due)
            };
            obligation.with_anchor(Anchor::day_of_month((idx % 31) as u32 + 1, 9, 0))
        })
        .collect()
}

fn build_history(count: usize, today: NaiveDate) -> Vec<HistoricalTransaction> {
    (0..count)
        .map(|idx| {
            HistoricalTransaction::new(
                today - Duration::days((idx % 60) as i64),
                Decimal::new(-(1_000 + (idx % 50) as i64 * 13), 2),
            )
        })
        .collect()
}

fn bench_conversion(c: &mut Criterion) {
    let obligations = build_obligations(black_box(10_000));

    c.bench_function("required_income_10k", |b| {
        b.iter(|| {
            let total = required_income(&obligations, ReportingCadence::Monthly);
            black_box(total);
        })
    });
}

fn bench_forecast(c: &mut Criterion) {
    let today = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();
    let obligations = build_obligations(black_box(1_000));
    let history = build_history(black_box(5_000), today);
    let scheduler = Scheduler::default();

    c.bench_function("flatten_obligations_365d", |b| {
        b.iter(|| {
            let events = events_from_obligations(&obligations, &scheduler, today, 365)
                .expect("flatten");
            black_box(events);
        })
    });

    let events =
        events_from_obligations(&obligations, &scheduler, today, 365).expect("seed events");
    c.bench_function("forecast_365d", |b| {
        b.iter(|| {
            let run = forecast(Decimal::from(5_000), Decimal::from(40), 365, today, &events)
                .expect("forecast");
            black_box(run);
        })
    });

    let forecaster = Forecaster::default();
    c.bench_function("forecaster_project_90d", |b| {
        b.iter_batched(
            || ForecastRequest {
                starting_balance: Decimal::from(5_000),
                pace_override: None,
                horizon_days: Some(90),
                today,
                obligations: &obligations,
                transactions: &history,
            },
            |request| {
                let run = forecaster.project(request).expect("project");
                black_box(run);
            },
            BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_conversion, bench_forecast);
criterion_main!(benches);
