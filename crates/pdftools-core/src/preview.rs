//! Page preview rendering and caching
//!
//! Rendering is delegated to a [`Renderer`] (pdf.js in the browser). A page
//! that fails or takes too long to render gets a placeholder instead, so the
//! selection state never depends on the renderer succeeding.

use async_trait::async_trait;
use futures::future::{self, Either};
use std::collections::HashMap;
use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct RenderError(pub String);

/// Rasterizes a single page of the loaded document
#[async_trait(?Send)]
pub trait Renderer {
    /// Handle to the rendered image (a data URL, a canvas, raw pixels...)
    type Bitmap;

    async fn render(&self, page: u32) -> Result<Self::Bitmap, RenderError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceholderReason {
    RenderFailed(String),
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview<B> {
    Bitmap(B),
    Placeholder(PlaceholderReason),
}

impl<B> Preview<B> {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Preview::Placeholder(_))
    }

    pub fn bitmap(&self) -> Option<&B> {
        match self {
            Preview::Bitmap(bitmap) => Some(bitmap),
            Preview::Placeholder(_) => None,
        }
    }
}

/// Render `page`, turning any failure into a placeholder
pub async fn render_or_placeholder<R>(renderer: &R, page: u32) -> Preview<R::Bitmap>
where
    R: Renderer + ?Sized,
{
    match renderer.render(page).await {
        Ok(bitmap) => Preview::Bitmap(bitmap),
        Err(e) => {
            tracing::warn!(page, error = %e, "preview render failed");
            Preview::Placeholder(PlaceholderReason::RenderFailed(e.0))
        }
    }
}

/// Render `page`, giving up when `timer` completes first
pub async fn render_within<R, T>(renderer: &R, page: u32, timer: T) -> Preview<R::Bitmap>
where
    R: Renderer + ?Sized,
    T: Future<Output = ()>,
{
    let render = render_or_placeholder(renderer, page);
    futures::pin_mut!(render);
    futures::pin_mut!(timer);

    match future::select(render, timer).await {
        Either::Left((preview, _)) => preview,
        Either::Right(((), _)) => {
            tracing::warn!(page, "preview render timed out");
            Preview::Placeholder(PlaceholderReason::TimedOut)
        }
    }
}

/// Render several pages concurrently, each bounded by its own timer
pub async fn render_pages<R, F, T>(
    renderer: &R,
    pages: &[u32],
    mut timer: F,
) -> Vec<(u32, Preview<R::Bitmap>)>
where
    R: Renderer + ?Sized,
    F: FnMut() -> T,
    T: Future<Output = ()>,
{
    let renders = pages.iter().map(|&page| {
        let deadline = timer();
        async move { (page, render_within(renderer, page, deadline).await) }
    });
    future::join_all(renders).await
}

/// Previews rendered so far for the current document
#[derive(Debug, Clone)]
pub struct PreviewCache<B> {
    entries: HashMap<u32, Preview<B>>,
}

impl<B> Default for PreviewCache<B> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<B> PreviewCache<B> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, page: u32) -> Option<&Preview<B>> {
        self.entries.get(&page)
    }

    pub fn contains(&self, page: u32) -> bool {
        self.entries.contains_key(&page)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Pages of `pages` that have no preview yet, in the given order
    pub fn missing(&self, pages: &[u32]) -> Vec<u32> {
        pages.iter().copied().filter(|p| !self.contains(*p)).collect()
    }

    pub fn store(&mut self, rendered: impl IntoIterator<Item = (u32, Preview<B>)>) {
        self.entries.extend(rendered);
    }

    /// Render and cache every page of `pages` not cached yet. Returns how many were rendered.
    pub async fn load<R, F, T>(&mut self, renderer: &R, pages: &[u32], timer: F) -> usize
    where
        R: Renderer<Bitmap = B> + ?Sized,
        F: FnMut() -> T,
        T: Future<Output = ()>,
    {
        let missing = self.missing(pages);
        if missing.is_empty() {
            return 0;
        }

        tracing::debug!(count = missing.len(), "rendering previews");
        let rendered = render_pages(renderer, &missing, timer).await;
        let count = rendered.len();
        self.store(rendered);
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;
    use std::cell::RefCell;

    /// Renders page N as the string "page-N", failing on the listed pages
    struct FakeRenderer {
        failing: Vec<u32>,
        calls: RefCell<Vec<u32>>,
    }

    impl FakeRenderer {
        fn new(failing: Vec<u32>) -> Self {
            Self {
                failing,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    #[async_trait(?Send)]
    impl Renderer for FakeRenderer {
        type Bitmap = String;

        async fn render(&self, page: u32) -> Result<String, RenderError> {
            self.calls.borrow_mut().push(page);
            if self.failing.contains(&page) {
                Err(RenderError("corrupt page".into()))
            } else {
                Ok(format!("page-{}", page))
            }
        }
    }

    struct HangingRenderer;

    #[async_trait(?Send)]
    impl Renderer for HangingRenderer {
        type Bitmap = String;

        async fn render(&self, _page: u32) -> Result<String, RenderError> {
            future::pending().await
        }
    }

    #[test]
    fn test_render_failure_becomes_placeholder() {
        let renderer = FakeRenderer::new(vec![2]);
        let preview = block_on(render_or_placeholder(&renderer, 2));
        assert_eq!(
            preview,
            Preview::Placeholder(PlaceholderReason::RenderFailed("corrupt page".into()))
        );
    }

    #[test]
    fn test_render_within_returns_bitmap_before_deadline() {
        let renderer = FakeRenderer::new(vec![]);
        let preview = block_on(render_within(&renderer, 3, future::pending::<()>()));
        assert_eq!(preview, Preview::Bitmap("page-3".to_string()));
    }

    #[test]
    fn test_hanging_render_times_out() {
        let preview = block_on(render_within(&HangingRenderer, 1, future::ready(())));
        assert_eq!(preview, Preview::Placeholder(PlaceholderReason::TimedOut));
    }

    #[test]
    fn test_cache_load_renders_only_missing_pages() {
        let renderer = FakeRenderer::new(vec![5]);
        let mut cache = PreviewCache::new();

        let rendered = block_on(cache.load(&renderer, &[4, 5, 6], future::pending::<()>));
        assert_eq!(rendered, 3);
        assert_eq!(cache.get(4).and_then(Preview::bitmap), Some(&"page-4".to_string()));
        assert!(cache.get(5).unwrap().is_placeholder());

        let rendered = block_on(cache.load(&renderer, &[5, 6, 7], future::pending::<()>));
        assert_eq!(rendered, 1);
        assert_eq!(*renderer.calls.borrow(), vec![4, 5, 6, 7]);
        assert_eq!(cache.len(), 4);
    }

    #[test]
    fn test_cache_clear() {
        let mut cache: PreviewCache<String> = PreviewCache::new();
        cache.store([(1, Preview::Bitmap("a".to_string()))]);
        assert_eq!(cache.missing(&[1, 2]), vec![2]);
        cache.clear();
        assert!(cache.is_empty());
    }
}
