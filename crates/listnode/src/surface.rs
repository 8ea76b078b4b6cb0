//! Scroll-surface collaborator capability.

/// The physical scroll view hosting the list.
///
/// The host forwards the surface's layout notifications to
/// [`ListNode::layout_pass`](crate::ListNode::layout_pass).
pub trait ScrollSurface {
    /// Current content offset along the scroll axis.
    fn content_offset(&self) -> f32;

    /// Move the content to `offset`, optionally animating.
    fn set_content_offset(&self, offset: f32, animated: bool);

    /// Extent of the visible viewport along the scroll axis.
    fn viewport_extent(&self) -> f32;
}
