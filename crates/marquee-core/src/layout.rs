//! Layout sampling: container and content widths and the overflow between them.
//!
//! Width measurement belongs to the host. The engine only asks a
//! [`LayoutOracle`] for two numbers after every visual update.

/// Source of rendered widths for the clipping container and the text run.
///
/// Returning `None` means the element is not attached or not laid out yet;
/// the sample is skipped and retried on the next update.
pub trait LayoutOracle {
    type Container: ?Sized;
    type Content: ?Sized;

    fn container_width(&self, container: &Self::Container) -> Option<f64>;

    fn content_width(&self, content: &Self::Content) -> Option<f64>;
}

/// One width sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Widths {
    pub container: f64,
    pub content: f64,
}

impl Widths {
    pub fn new(container: f64, content: f64) -> Self {
        Self { container, content }
    }

    /// Distance the content has to travel to be fully revealed; `<= 0` means it fits
    #[inline]
    pub fn overflow(&self) -> f64 {
        self.content - self.container
    }
}

/// Sample both widths, or `None` if either handle is missing or unmeasured
pub fn sample<O: LayoutOracle>(
    oracle: &O,
    container: Option<&O::Container>,
    content: Option<&O::Content>,
) -> Option<Widths> {
    let container = oracle.container_width(container?)?;
    let content = oracle.content_width(content?)?;
    if !(container.is_finite() && content.is_finite()) {
        return None;
    }
    Some(Widths::new(container, content))
}
