pub mod app_init;
pub mod bootstrap;
pub mod token_store;

#[cfg(test)]
pub(crate) mod test_support;
