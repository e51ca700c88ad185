/// A scope guard that runs a release function when dropped.
///
/// Used wherever a resource must be handed back on every exit path, including
/// early returns through `?` and unwinding. The file lock taken during history
/// compaction is released this way.
///
/// # Examples
///
/// ```
/// use histnav::utils::guard::OnDrop;
///
/// let mut released = false;
/// {
///     let _guard = OnDrop::with(|| released = true);
/// }
/// assert!(released);
/// ```
pub struct OnDrop<Release: FnOnce()> {
    release: Option<Release>,
}

impl<F: FnOnce()> OnDrop<F> {
    /// Creates a guard that runs `f` when it goes out of scope.
    pub fn with(f: F) -> Self {
        Self { release: Some(f) }
    }
}

impl<F: FnOnce()> Drop for OnDrop<F> {
    fn drop(&mut self) {
        if let Some(f) = self.release.take() {
            f()
        }
    }
}
