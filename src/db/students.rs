use sqlx::SqlitePool;

use crate::models::{RegisterRequest, Student};

const STUDENT_COLUMNS: &str = "id, email, password_hash, first_name, last_name, student_id, \
     year_of_study, total_credits_earned, created_at";

pub async fn insert_student(
    db: &SqlitePool,
    req: &RegisterRequest,
    password_hash: &str,
) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        r#"
        INSERT INTO students
            (email, password_hash, first_name, last_name, student_id, year_of_study)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        RETURNING {STUDENT_COLUMNS}
        "#
    ))
    .bind(&req.email)
    .bind(password_hash)
    .bind(&req.first_name)
    .bind(&req.last_name)
    .bind(&req.student_id)
    .bind(req.year_of_study)
    .fetch_one(db)
    .await
}

pub async fn find_student_by_email(
    db: &SqlitePool,
    email: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {STUDENT_COLUMNS} FROM students WHERE email = ?"
    ))
    .bind(email)
    .fetch_optional(db)
    .await
}

pub async fn find_student_by_id(db: &SqlitePool, id: i64) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {STUDENT_COLUMNS} FROM students WHERE id = ?"))
        .bind(id)
        .fetch_optional(db)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;

    fn register_request() -> RegisterRequest {
        RegisterRequest {
            email: "dana.ismailova@nu.edu.kz".to_string(),
            password: "correct horse".to_string(),
            first_name: "Dana".to_string(),
            last_name: "Ismailova".to_string(),
            student_id: "202312345".to_string(),
            year_of_study: 2,
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_student() {
        let pool = connect_in_memory().await.expect("Failed to create test db");

        let student = insert_student(&pool, &register_request(), "hash")
            .await
            .expect("Failed to insert student");
        assert_eq!(student.total_credits_earned, 0);
        assert_eq!(student.password_hash, "hash");

        let by_email = find_student_by_email(&pool, "dana.ismailova@nu.edu.kz")
            .await
            .unwrap()
            .expect("student not found");
        assert_eq!(by_email.id, student.id);

        let by_id = find_student_by_id(&pool, student.id).await.unwrap();
        assert!(by_id.is_some());
        assert!(find_student_by_id(&pool, student.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_unique_violation() {
        let pool = connect_in_memory().await.expect("Failed to create test db");

        insert_student(&pool, &register_request(), "hash").await.unwrap();
        let mut again = register_request();
        again.student_id = "202399999".to_string();

        let err = insert_student(&pool, &again, "hash").await.unwrap_err();
        assert!(crate::error::is_unique_violation(&err));
    }
}
