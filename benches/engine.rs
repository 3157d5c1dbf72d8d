use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use growth_eng::engine::{ACCRUAL_WINDOW_MINUTES, accrue};
use growth_eng::model::{Investment, InvestmentStatus};
use growth_eng::wallet::withdrawable_amount;
use growth_eng::{Amount, Engine, UserRecord};

const MINUTE_MS: i64 = 60_000;
const START: i64 = 1_700_000_000_000;

fn bench_accrue(c: &mut Criterion) {
    let mut group = c.benchmark_group("accrue");
    let amount = Amount::from_float(1000.0);

    for minutes in [0, 5_040, ACCRUAL_WINDOW_MINUTES, 2 * ACCRUAL_WINDOW_MINUTES] {
        group.bench_with_input(
            BenchmarkId::from_parameter(minutes),
            &minutes,
            |b, &minutes| {
                let now = START + minutes * MINUTE_MS;
                b.iter(|| accrue(black_box(amount), black_box(START), black_box(now)));
            },
        );
    }

    group.finish();
}

fn bench_engine_ticks(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine_ticks");

    // one simulated day of minute ticks
    group.bench_function("1440_ticks", |b| {
        b.iter(|| {
            let user: UserRecord = serde_json::from_str(
                r#"{ "id": 1, "investment": {
                    "amount": 1000, "startTime": 1700000000000,
                    "status": "active", "profit": 0, "completed": false } }"#,
            )
            .unwrap();
            let mut engine = Engine::new(user);
            for minute in 1..=1_440 {
                black_box(engine.tick(START + minute * MINUTE_MS));
            }
            engine
        });
    });

    group.finish();
}

fn bench_withdrawable(c: &mut Criterion) {
    let mut group = c.benchmark_group("withdrawable");

    for count in [1usize, 100, 10_000] {
        let investments: Vec<Investment> = (0..count)
            .map(|i| Investment {
                amount: Amount::from_float(100.0 + i as f64),
                start_time: START,
                status: if i % 3 == 0 {
                    InvestmentStatus::Completed
                } else if i % 3 == 1 {
                    InvestmentStatus::Active
                } else {
                    InvestmentStatus::Inactive
                },
                profit: Amount::from_float(35.0),
                completed: i % 3 == 0,
            })
            .collect();

        group.bench_with_input(
            BenchmarkId::from_parameter(count),
            &investments,
            |b, investments| {
                b.iter(|| {
                    withdrawable_amount(black_box(investments), Amount::from_float(50.0))
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_accrue, bench_engine_ticks, bench_withdrawable);
criterion_main!(benches);
