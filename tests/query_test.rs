// ABOUTME: Integration tests for filtered, sorted and paged collection queries
// ABOUTME: Runs the query builder against real SQLite to check search, ordering and page metadata
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 LiftLog Contributors

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use liftlog_server::database::{
    Database, EquipmentGroupRepository, EquipmentRepository, ExerciseMuscleGroupRepository,
    ExerciseTypeRepository, MuscleFunctionRepository, MuscleGroupRepository, Repository, Scope,
};
use liftlog_server::models::{
    EquipmentInput, ExerciseMuscleGroupInput, ExerciseTypeInput, MuscleGroup, NamedEntityInput,
};
use liftlog_server::pagination::{PagedResult, QueryRequest, SortDirection};

async fn seed_muscle_groups(database: &Database, names: &[(&str, Option<&str>)]) {
    let repo: MuscleGroupRepository = database.repository();
    for (name, description) in names {
        repo.create(
            &Scope::Shared,
            &NamedEntityInput {
                name: (*name).to_owned(),
                description: description.map(str::to_owned),
            },
        )
        .await
        .unwrap();
    }
}

fn names(page: &PagedResult<MuscleGroup>) -> Vec<&str> {
    page.items.iter().map(|group| group.name.as_str()).collect()
}

async fn list(database: &Database, request: QueryRequest) -> PagedResult<MuscleGroup> {
    database
        .repository::<MuscleGroupRepository>()
        .list(&Scope::Shared, &request)
        .await
        .unwrap()
}

#[tokio::test]
async fn test_default_listing_sorts_by_name_ascending() {
    let database = common::create_test_database().await;
    seed_muscle_groups(
        &database,
        &[("Triceps", None), ("Biceps", None), ("chest", None)],
    )
    .await;

    let page = list(&database, QueryRequest::default()).await;
    assert_eq!(names(&page), vec!["Biceps", "chest", "Triceps"]);
    assert_eq!(page.page, 1);
    assert_eq!(page.page_size, 20);
    assert_eq!(page.total_count, 3);
    assert_eq!(page.total_pages, 1);
    assert!(!page.has_next_page);
    assert!(!page.has_previous_page);
}

#[tokio::test]
async fn test_sort_direction_and_case_insensitive_sort_field() {
    let database = common::create_test_database().await;
    seed_muscle_groups(&database, &[("Abs", None), ("Calves", None), ("Back", None)]).await;

    let page = list(
        &database,
        QueryRequest {
            sort_by: Some("NAME".into()),
            sort_direction: Some(SortDirection::Desc),
            ..QueryRequest::default()
        },
    )
    .await;
    assert_eq!(names(&page), vec!["Calves", "Back", "Abs"]);
}

#[tokio::test]
async fn test_search_matches_name_or_description_case_insensitively() {
    let database = common::create_test_database().await;
    seed_muscle_groups(
        &database,
        &[
            ("Quadriceps", Some("Front of the thigh")),
            ("Hamstrings", Some("Back of the THIGH")),
            ("Lats", Some("Upper back")),
        ],
    )
    .await;

    let page = list(
        &database,
        QueryRequest {
            search: Some("  thigh ".into()),
            ..QueryRequest::default()
        },
    )
    .await;
    assert_eq!(names(&page), vec!["Hamstrings", "Quadriceps"]);
    assert_eq!(page.total_count, 2);

    let blank = list(
        &database,
        QueryRequest {
            search: Some("   ".into()),
            ..QueryRequest::default()
        },
    )
    .await;
    assert_eq!(blank.total_count, 3);
}

#[tokio::test]
async fn test_search_matches_non_ascii_names() {
    let database = common::create_test_database().await;
    seed_muscle_groups(
        &database,
        &[("Ärmel", Some("Oberarm")), ("Übung", None), ("Arms", None)],
    )
    .await;

    let exact = list(
        &database,
        QueryRequest {
            search: Some("Ärmel".into()),
            ..QueryRequest::default()
        },
    )
    .await;
    assert_eq!(names(&exact), vec!["Ärmel"]);
    assert_eq!(exact.total_count, 1);

    let ascii_folded = list(
        &database,
        QueryRequest {
            search: Some("RMEL".into()),
            ..QueryRequest::default()
        },
    )
    .await;
    assert_eq!(names(&ascii_folded), vec!["Ärmel"]);

    let inner = list(
        &database,
        QueryRequest {
            search: Some("bung".into()),
            ..QueryRequest::default()
        },
    )
    .await;
    assert_eq!(names(&inner), vec!["Übung"]);
}

#[tokio::test]
async fn test_search_treats_wildcards_literally() {
    let database = common::create_test_database().await;
    seed_muscle_groups(
        &database,
        &[
            ("Grip_100%", None),
            ("Grip 100 percent", None),
            ("Gripx100", None),
        ],
    )
    .await;

    let percent = list(
        &database,
        QueryRequest {
            search: Some("100%".into()),
            ..QueryRequest::default()
        },
    )
    .await;
    assert_eq!(names(&percent), vec!["Grip_100%"]);

    let underscore = list(
        &database,
        QueryRequest {
            search: Some("p_1".into()),
            ..QueryRequest::default()
        },
    )
    .await;
    assert_eq!(names(&underscore), vec!["Grip_100%"]);
}

#[tokio::test]
async fn test_paging_reports_totals_and_handles_pages_past_the_end() {
    let database = common::create_test_database().await;
    let seeded: Vec<String> = (1..=5).map(|n| format!("Group {n}")).collect();
    let pairs: Vec<(&str, Option<&str>)> = seeded.iter().map(|n| (n.as_str(), None)).collect();
    seed_muscle_groups(&database, &pairs).await;

    let second = list(
        &database,
        QueryRequest {
            page: Some(2),
            page_size: Some(2),
            ..QueryRequest::default()
        },
    )
    .await;
    assert_eq!(names(&second), vec!["Group 3", "Group 4"]);
    assert_eq!(second.total_count, 5);
    assert_eq!(second.total_pages, 3);
    assert!(second.has_next_page);
    assert!(second.has_previous_page);

    let last = list(
        &database,
        QueryRequest {
            page: Some(3),
            page_size: Some(2),
            ..QueryRequest::default()
        },
    )
    .await;
    assert_eq!(names(&last), vec!["Group 5"]);
    assert!(!last.has_next_page);

    let beyond = list(
        &database,
        QueryRequest {
            page: Some(9),
            page_size: Some(2),
            ..QueryRequest::default()
        },
    )
    .await;
    assert!(beyond.items.is_empty());
    assert_eq!(beyond.page, 9);
    assert_eq!(beyond.total_count, 5);
    assert!(!beyond.has_next_page);
}

#[tokio::test]
async fn test_paging_is_stable_for_equal_sort_keys() {
    let database = common::create_test_database().await;
    seed_muscle_groups(
        &database,
        &[("A", None), ("B", None), ("C", None), ("D", None)],
    )
    .await;

    // Rows created in the same microsecond tie on created_at; id breaks the tie
    let mut seen = Vec::new();
    for page in 1..=2 {
        let result = database
            .repository::<MuscleGroupRepository>()
            .list(
                &Scope::Shared,
                &QueryRequest {
                    sort_by: Some("created_at".into()),
                    page: Some(page),
                    page_size: Some(2),
                    ..QueryRequest::default()
                },
            )
            .await
            .unwrap();
        seen.extend(result.items.into_iter().map(|group| group.meta.id));
    }

    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 4);
}

#[tokio::test]
async fn test_equipment_listed_by_group() {
    let database = common::create_test_database().await;
    let groups: EquipmentGroupRepository = database.repository();
    let equipment: EquipmentRepository = database.repository();
    let free = groups
        .create(
            &Scope::Shared,
            &NamedEntityInput {
                name: "Free weights".into(),
                description: None,
            },
        )
        .await
        .unwrap();

    for (name, group) in [
        ("Barbell", Some(free.meta.id)),
        ("Dumbbell", Some(free.meta.id)),
        ("Treadmill", None),
    ] {
        equipment
            .create(
                &Scope::Shared,
                &EquipmentInput {
                    name: name.into(),
                    description: None,
                    equipment_group_id: group,
                },
            )
            .await
            .unwrap();
    }

    let page = equipment
        .list_by_group(free.meta.id, &QueryRequest::default())
        .await
        .unwrap();
    let listed: Vec<_> = page.items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(listed, vec!["Barbell", "Dumbbell"]);
}

#[tokio::test]
async fn test_exercise_types_listed_by_muscle_group() {
    let database = common::create_test_database().await;
    let exercises: ExerciseTypeRepository = database.repository();
    let mut ids = Vec::new();
    for name in ["Squat", "Deadlift", "Curl"] {
        let created = exercises
            .create(
                &Scope::Shared,
                &ExerciseTypeInput {
                    name: name.into(),
                    description: None,
                    instructions: None,
                },
            )
            .await
            .unwrap();
        ids.push(created.meta.id);
    }
    let glutes = database
        .repository::<MuscleGroupRepository>()
        .create(
            &Scope::Shared,
            &NamedEntityInput {
                name: "Glutes".into(),
                description: None,
            },
        )
        .await
        .unwrap();
    let primary = database
        .repository::<MuscleFunctionRepository>()
        .create(
            &Scope::Shared,
            &NamedEntityInput {
                name: "Primary".into(),
                description: None,
            },
        )
        .await
        .unwrap();

    let links: ExerciseMuscleGroupRepository = database.repository();
    for exercise_type_id in &ids[..2] {
        links
            .create(
                &Scope::Shared,
                &ExerciseMuscleGroupInput {
                    exercise_type_id: *exercise_type_id,
                    muscle_group_id: glutes.meta.id,
                    muscle_function_id: primary.meta.id,
                },
            )
            .await
            .unwrap();
    }

    let page = exercises
        .list_by_muscle_group(glutes.meta.id, &QueryRequest::default())
        .await
        .unwrap();
    let listed: Vec<_> = page.items.iter().map(|item| item.name.as_str()).collect();
    assert_eq!(listed, vec!["Deadlift", "Squat"]);
    assert_eq!(page.total_count, 2);
}
