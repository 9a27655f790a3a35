#[cfg(debug_assertions)]
use opentelemetry::KeyValue;

pub mod labels {
    pub const DB_SYSTEM_NAME: &str = "db.system.name";
    pub const DB_OPERATION_NAME: &str = "db.operation.name";
    pub const OPERATION_CATEGORY: &str = "db.weaviate.operation.category";
    pub const OPERATION_SUCCESS: &str = "db.weaviate.operation.success";
    pub const ERROR_TYPE: &str = "error.type";
}

pub mod names {
    pub const DB_CLIENT_OPERATION_DURATION: &str = "db.client.operation.duration";
    pub const DB_CLIENT_RESPONSE_RETURNED_ROWS: &str = "db.client.response.returned_rows";
}

pub(crate) const METRIC_LABELS: &[(&str, &[&str])] = &[
    (
        names::DB_CLIENT_OPERATION_DURATION,
        &[
            labels::DB_SYSTEM_NAME,
            labels::DB_OPERATION_NAME,
            labels::OPERATION_CATEGORY,
            labels::OPERATION_SUCCESS,
            labels::ERROR_TYPE,
        ],
    ),
    (
        names::DB_CLIENT_RESPONSE_RETURNED_ROWS,
        &[
            labels::DB_SYSTEM_NAME,
            labels::DB_OPERATION_NAME,
            labels::OPERATION_CATEGORY,
        ],
    ),
];

pub fn labels_for(metric_name: &str) -> Option<&'static [&'static str]> {
    METRIC_LABELS
        .iter()
        .find(|(name, _)| *name == metric_name)
        .map(|(_, labels)| *labels)
}

#[cfg(debug_assertions)]
pub(crate) fn debug_assert_attrs(metric_name: &'static str, attrs: &[KeyValue]) {
    let labels = labels_for(metric_name)
        .unwrap_or_else(|| panic!("missing metric catalog entry for {metric_name}"));

    for attr in attrs {
        debug_assert!(
            labels.contains(&attr.key.as_str()),
            "attribute '{}' is not declared for metric '{}'",
            attr.key.as_str(),
            metric_name
        );
    }
}
