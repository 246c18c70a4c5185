pub mod column_resolver;
pub mod examples_catalog;
pub mod export_generator;
pub mod intent_classifier;
pub mod query_dispatcher;
pub mod question_parsing;
pub mod table_store;

#[cfg(test)]
pub mod test_support;
