use diesel_async::pooled_connection::deadpool::Pool;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::AsyncPgConnection;

pub type DbPool = Pool<AsyncPgConnection>;

/// Create a Diesel async connection pool. Connections are established
/// lazily on first checkout.
pub async fn connect(database_url: &str) -> DbPool {
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(database_url);
    let pool = Pool::builder(manager)
        .max_size(20)
        .build()
        .expect("failed to build connection pool");

    tracing::info!("database pool created");

    pool
}

/// Release all held storage connections at controlled shutdown.
///
/// No in-flight operation recovery is attempted; callers must ensure the
/// pool sees no concurrent use during or after this call.
pub fn close_pool(pool: &DbPool) {
    pool.close();
    tracing::info!("database pool closed");
}
