use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpacityError {
    #[error("layer `{0}` does not exist in the current style")]
    UnknownLayer(String),

    #[error("layer `{layer}` has type `{kind}`, which has no opacity channel")]
    UnsupportedLayerType { layer: String, kind: String },
}
