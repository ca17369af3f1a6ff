use chrono::{TimeDelta, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use dojo_coach::db::SyncedState;
use dojo_coach::dto::CoordinatorContext;
use dojo_coach::models::{
    ActivityType, ClimbRoute, ClimbingWorkout, DailyWorkout, FitnessLevel, Goal, GradeValue,
    RunningWorkout, WorkoutSession,
};
use dojo_coach::services::build_coordinator_context;
use std::hint::black_box;
use uuid::Uuid;

const GRADE_INPUTS: [&str; 8] = ["5.10c", " 510C", "10c", "5.9", "v7", " V07 ", "v 10", "12"];

/// Four weeks of mixed sessions, the size of a typical coordinator plan.
fn month_state() -> SyncedState {
    let start = Utc.with_ymd_and_hms(2025, 10, 1, 0, 0, 0).unwrap();
    let plans = (0..28)
        .map(|day| DailyWorkout {
            tracking_id: Uuid::new_v4(),
            date: start + TimeDelta::days(day),
            sessions: vec![
                WorkoutSession::Climbing(ClimbingWorkout {
                    description: "Volume".to_string(),
                    routes: ["5.10a", "5.10d", "5.11b", "V4", "V5"]
                        .iter()
                        .map(|g| ClimbRoute {
                            id: Uuid::new_v4(),
                            grade: g.parse().unwrap(),
                            description: "Route".to_string(),
                        })
                        .collect(),
                }),
                WorkoutSession::Running(RunningWorkout {
                    description: "Easy".to_string(),
                    distance_km: 8.0,
                    heart_rate: 140,
                    elevation_gain: 60,
                    pace_sec_per_km: 330.0,
                }),
            ],
        })
        .collect();

    SyncedState {
        goals: vec![Goal::new(ActivityType::Climbing, "5.12a", "", start + TimeDelta::days(90))],
        fitness_levels: ActivityType::ALL.iter().map(|a| FitnessLevel::empty(*a)).collect(),
        plans,
    }
}

fn benchmark_grade_parsing(c: &mut Criterion) {
    c.bench_function("parse_loose_grades", |b| {
        b.iter(|| {
            for input in GRADE_INPUTS {
                let _ = black_box(input).parse::<GradeValue>();
            }
        })
    });
}

fn benchmark_context_mapping(c: &mut Criterion) {
    let local = month_state();
    let user_id = Uuid::new_v4();
    let json = serde_json::to_string(&build_coordinator_context(user_id, &local))
        .expect("Failed to encode context");

    let mut group = c.benchmark_group("coordinator_context");

    group.bench_function("build_and_encode", |b| {
        b.iter(|| {
            let ctx = build_coordinator_context(user_id, black_box(&local));
            serde_json::to_string(&ctx).expect("Failed to encode context")
        })
    });

    group.bench_function("decode_and_map", |b| {
        b.iter(|| {
            let ctx: CoordinatorContext =
                serde_json::from_str(black_box(&json)).expect("Failed to decode context");
            SyncedState::try_from(ctx).expect("Failed to map context")
        })
    });

    group.finish();
}

criterion_group!(benches, benchmark_grade_parsing, benchmark_context_mapping);
criterion_main!(benches);
