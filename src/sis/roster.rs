use anyhow::Result;
use futures::stream::{FuturesUnordered, StreamExt};

use crate::config::RosterConfig;
use crate::credentials::AuthError;
use crate::sis::client::SisClient;
use crate::sis::types::{ApiEnrollment, Enrollment, Page, Student, StudentEnrollments};

const USERS_ENDPOINT: &str = "v1/users";
const ENROLLMENTS_ENDPOINT: &str = "v1/academics/enrollments";

/// Students fetched concurrently
const MAX_CONCURRENT_STUDENTS: usize = 8;

/// Safety stop for a misbehaving `next_link` chain
const MAX_PAGES: usize = 500;

fn roster_params(roster: &RosterConfig) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("grad_year", roster.grad_year_start.to_string()),
        ("end_grad_year", roster.grad_year_end.to_string()),
    ];
    if let Some(role) = &roster.role_id {
        params.push(("roles", role.clone()));
    }
    params
}

fn enrollments_endpoint(student_id: u64) -> String {
    format!("{}/{}", ENROLLMENTS_ENDPOINT, student_id)
}

/// Fetch the student roster for the configured graduation years, following
/// `next_link` until the last page.
pub async fn fetch_student_roster(client: &SisClient, roster: &RosterConfig) -> Result<Vec<Student>> {
    let mut students = Vec::new();
    let first_params = roster_params(roster);

    let mut page: Page<Student> = client.get_json(USERS_ENDPOINT, &first_params).await?;
    let mut pages = 1;
    loop {
        students.extend(page.value);
        let next = match page.next_link {
            Some(link) if !link.is_empty() => link,
            _ => break,
        };
        if pages >= MAX_PAGES {
            tracing::warn!(pages, "Roster pagination stopped early");
            break;
        }
        // next_link already carries the query string
        page = client.get_json(&next, &[]).await?;
        pages += 1;
    }

    tracing::info!(count = students.len(), pages, "Fetched student roster");
    Ok(students)
}

/// Fetch one student's enrollments for one school year.
pub async fn fetch_enrollments(
    client: &SisClient,
    student_id: u64,
    school_year: &str,
) -> Result<Vec<Enrollment>> {
    let params = [("school_year", school_year.to_string())];
    let page: Page<ApiEnrollment> = client
        .get_json(&enrollments_endpoint(student_id), &params)
        .await?;

    Ok(page
        .value
        .into_iter()
        .filter_map(|row| row.into_enrollment(student_id, school_year))
        .collect())
}

/// Fetch every configured school year for a student, in the given order.
///
/// A failing year is logged and skipped; authentication failures abort.
pub async fn fetch_student_enrollments(
    client: &SisClient,
    student: &Student,
    school_years: &[String],
) -> Result<Vec<Enrollment>> {
    let mut enrollments = Vec::new();
    for year in school_years {
        match fetch_enrollments(client, student.id, year).await {
            Ok(rows) => {
                tracing::debug!(student = student.id, year = %year, count = rows.len(), "Fetched enrollments");
                enrollments.extend(rows);
            }
            Err(e) if e.downcast_ref::<AuthError>().is_some() => return Err(e),
            Err(e) => {
                tracing::warn!(student = student.id, year = %year, "Failed to fetch enrollments: {:#}", e);
            }
        }
    }
    Ok(enrollments)
}

/// Fetch enrollments for every student with bounded concurrency.
///
/// Results come back in roster order regardless of completion order.
pub async fn fetch_all_enrollments(
    client: &SisClient,
    students: Vec<Student>,
    school_years: &[String],
) -> Result<Vec<StudentEnrollments>> {
    let total = students.len();
    let mut futures = FuturesUnordered::new();
    let mut pending = students.into_iter().enumerate();
    let mut results: Vec<Option<StudentEnrollments>> = vec![None; total];

    let spawn = |(index, student): (usize, Student)| async move {
        let result = fetch_student_enrollments(client, &student, school_years).await;
        (index, student, result)
    };

    for _ in 0..MAX_CONCURRENT_STUDENTS {
        if let Some(next) = pending.next() {
            futures.push(spawn(next));
        }
    }

    let mut done = 0;
    while let Some((index, student, result)) = futures.next().await {
        let enrollments = result?;
        done += 1;
        tracing::info!(
            "[{}/{}] {}: {} enrollments",
            done,
            total,
            student.display_name(),
            enrollments.len()
        );
        results[index] = Some(StudentEnrollments { student, enrollments });

        if let Some(next) = pending.next() {
            futures.push(spawn(next));
        }
    }

    Ok(results.into_iter().flatten().collect())
}

/// Cheap authenticated request used by `check` to confirm credentials and scopes.
pub async fn probe(client: &SisClient, roster: &RosterConfig) -> Result<usize> {
    let page: Page<Student> = client.get_json(USERS_ENDPOINT, &roster_params(roster)).await?;
    Ok(page.value.len())
}
