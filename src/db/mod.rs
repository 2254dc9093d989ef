pub mod postgres;
pub mod profiles;
pub mod redis;

pub use postgres::create_pool;
pub use profiles::PostgresProfileStore;
pub use profiles::ProfileStore;
pub use redis::create_redis_client;
pub use redis::CacheKey;
pub use redis::RecommendationCache;
pub use redis::RedisCache;
