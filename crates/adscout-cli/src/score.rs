use chrono::Utc;
use sqlx::SqlitePool;

/// Recompute every ad's score as of now.
///
/// # Errors
///
/// Returns an error if the scoring transaction fails.
pub(crate) async fn run_score(pool: &SqlitePool) -> anyhow::Result<()> {
    let scored = adscout_db::recompute_scores(pool, Utc::now()).await?;
    println!("Scores computed for {scored} ads.");
    Ok(())
}
