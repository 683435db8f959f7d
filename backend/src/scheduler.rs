use diesel::prelude::*;
use diesel_async::RunQueryDsl;

/// Recomputes the public scoreboard on a fixed interval and publishes it
/// for anyone holding the receiver. This replaces ad-hoc client side
/// polling loops, consumers read the last published value instead of each
/// driving their own refresh.
pub fn spawn_standings_refresh(
    period: std::time::Duration,
    publisher: tokio::sync::watch::Sender<Vec<common::standings::StandingRow>>,
) -> tokio::task::JoinHandle<()> {
    tokio::task::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;

            if let Err(e) = refresh(&publisher).await {
                tracing::error!("Refreshing standings: {:?}", e);
            }
        }
    })
}

async fn refresh(
    publisher: &tokio::sync::watch::Sender<Vec<common::standings::StandingRow>>,
) -> Result<(), diesel::result::Error> {
    let mut db_con = crate::db_connection().await;

    // the newest tournament drives the public scoreboard
    let query = crate::schema::tournaments::dsl::tournaments
        .order(crate::schema::tournaments::dsl::created_at.desc())
        .limit(1)
        .select(crate::models::Tournament::as_select());

    let mut tournament_rows: Vec<crate::models::Tournament> = query.load(&mut db_con).await?;

    let tournament = match tournament_rows.pop() {
        Some(t) => t,
        None => {
            publisher.send_replace(Vec::new());
            return Ok(());
        }
    };

    let ranked = crate::standings::load_ranked_standings(&mut db_con, tournament.id).await?;

    publisher.send_replace(crate::standings::to_rows(&ranked));

    Ok(())
}
