pub mod fetcher;

pub use fetcher::Fetcher;

#[cfg(test)]
pub use fetcher::MockFetcher;
