//! Category, course and purchase persistence.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

/// Row returned by category queries.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CategoryRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Fields supplied when creating or updating a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Row returned by course queries, with the joined category name.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CourseRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: Option<i64>,
    pub difficulty: String,
    pub created_at: NaiveDateTime,
    pub category_name: Option<String>,
}

/// Fields supplied when creating or updating a course.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseInput {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default = "default_course_difficulty")]
    pub difficulty: String,
}

fn default_course_difficulty() -> String {
    "beginner".to_string()
}

/// A purchased course as listed for its buyer.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct PurchasedCourseRow {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub category_id: Option<i64>,
    pub difficulty: String,
    pub created_at: NaiveDateTime,
    pub purchased_at: NaiveDateTime,
    pub amount: f64,
}

/// List all categories ordered by name.
pub async fn list_categories(pool: &SqlitePool) -> Result<Vec<CategoryRow>, sqlx::Error> {
    sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, description, created_at FROM categories ORDER BY name",
    )
    .fetch_all(pool)
    .await
}

/// Get a category by ID.
pub async fn get_category(
    pool: &SqlitePool,
    category_id: i64,
) -> Result<Option<CategoryRow>, sqlx::Error> {
    sqlx::query_as::<_, CategoryRow>(
        "SELECT id, name, description, created_at FROM categories WHERE id = ?",
    )
    .bind(category_id)
    .fetch_optional(pool)
    .await
}

/// Create a category, returning its ID.
pub async fn create_category(pool: &SqlitePool, input: &CategoryInput) -> Result<i64, sqlx::Error> {
    let result = sqlx::query("INSERT INTO categories (name, description) VALUES (?, ?)")
        .bind(&input.name)
        .bind(&input.description)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Update a category. Returns whether a row was changed.
pub async fn update_category(
    pool: &SqlitePool,
    category_id: i64,
    input: &CategoryInput,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE categories SET name = ?, description = ? WHERE id = ?")
        .bind(&input.name)
        .bind(&input.description)
        .bind(category_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a category. Returns whether a row was removed.
pub async fn delete_category(pool: &SqlitePool, category_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(category_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

const COURSE_SELECT: &str = r#"
    SELECT c.id, c.title, c.description, c.price, c.category_id, c.difficulty,
           c.created_at, cat.name AS category_name
    FROM courses c
    LEFT JOIN categories cat ON c.category_id = cat.id
"#;

/// List all courses, newest first.
pub async fn list_courses(pool: &SqlitePool) -> Result<Vec<CourseRow>, sqlx::Error> {
    let sql = format!("{COURSE_SELECT} ORDER BY c.created_at DESC, c.id DESC");
    sqlx::query_as::<_, CourseRow>(&sql).fetch_all(pool).await
}

/// Get a course by ID.
pub async fn get_course(pool: &SqlitePool, course_id: i64) -> Result<Option<CourseRow>, sqlx::Error> {
    let sql = format!("{COURSE_SELECT} WHERE c.id = ?");
    sqlx::query_as::<_, CourseRow>(&sql)
        .bind(course_id)
        .fetch_optional(pool)
        .await
}

/// Create a course, returning its ID.
pub async fn create_course(pool: &SqlitePool, input: &CourseInput) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO courses (title, description, price, category_id, difficulty) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.price)
    .bind(input.category_id)
    .bind(&input.difficulty)
    .execute(pool)
    .await?;
    Ok(result.last_insert_rowid())
}

/// Update a course. Returns whether a row was changed.
pub async fn update_course(
    pool: &SqlitePool,
    course_id: i64,
    input: &CourseInput,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE courses
        SET title = ?, description = ?, price = ?, category_id = ?, difficulty = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.title)
    .bind(&input.description)
    .bind(input.price)
    .bind(input.category_id)
    .bind(&input.difficulty)
    .bind(course_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Delete a course. Returns whether a row was removed.
pub async fn delete_course(pool: &SqlitePool, course_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM courses WHERE id = ?")
        .bind(course_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Whether a user already owns a course.
pub async fn has_purchased(
    pool: &SqlitePool,
    user_id: i64,
    course_id: i64,
) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM purchases WHERE user_id = ? AND course_id = ?)",
    )
    .bind(user_id)
    .bind(course_id)
    .fetch_one(pool)
    .await
}

/// Record a purchase, returning its ID.
pub async fn create_purchase(
    pool: &SqlitePool,
    user_id: i64,
    course_id: i64,
    amount: f64,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query("INSERT INTO purchases (user_id, course_id, amount) VALUES (?, ?, ?)")
        .bind(user_id)
        .bind(course_id)
        .bind(amount)
        .execute(pool)
        .await?;
    Ok(result.last_insert_rowid())
}

/// Courses purchased by a user, most recent purchase first.
pub async fn list_purchases(
    pool: &SqlitePool,
    user_id: i64,
) -> Result<Vec<PurchasedCourseRow>, sqlx::Error> {
    sqlx::query_as::<_, PurchasedCourseRow>(
        r#"
        SELECT c.id, c.title, c.description, c.price, c.category_id, c.difficulty,
               c.created_at, p.purchased_at, p.amount
        FROM purchases p
        JOIN courses c ON p.course_id = c.id
        WHERE p.user_id = ?
        ORDER BY p.purchased_at DESC, p.id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
