/// Hero carousel slide collection
///
/// Slides live embedded in the hero settings document as an ordered list.
/// `SlideList` owns the ordering invariant: `order` is always the dense
/// sequence 1..N in document order, reassigned on every mutation. Callers
/// never write `order` directly; on whole-document replacement the incoming
/// values are only used as a sort key.
use crate::error::{StoreError, StoreResult};
use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};

/// Slide identifier.
///
/// Stored as a string (minted from a Unix-millisecond timestamp), but
/// clients have historically sent it back as either a JSON string or a
/// JSON number. Both deserialize to the same id, so comparisons past this
/// boundary are plain string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SlideId(String);

impl SlideId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SlideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SlideId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Ok(SlideId(s)),
            Raw::Number(n) => Ok(SlideId(n.to_string())),
        }
    }
}

/// How the slide image is fitted into the banner frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
    Fill,
}

impl ImageFit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFit::Cover => "cover",
            ImageFit::Contain => "contain",
            ImageFit::Fill => "fill",
        }
    }
}

fn default_position() -> i64 {
    50
}

fn default_zoom() -> i64 {
    100
}

/// One carousel slide
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    pub id: SlideId,
    pub image_url: String,
    /// 1-based position in the carousel; maintained by `SlideList`
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub cta_text: String,
    #[serde(default)]
    pub cta_link: String,
    #[serde(default)]
    pub image_fit: ImageFit,
    #[serde(default = "default_position")]
    pub image_position_x: i64,
    #[serde(default = "default_position")]
    pub image_position_y: i64,
    #[serde(default = "default_zoom")]
    pub image_zoom: i64,
}

/// Fields accepted when creating a slide
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewSlide {
    pub image_url: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
    pub image_fit: Option<ImageFit>,
    pub image_position_x: Option<i64>,
    pub image_position_y: Option<i64>,
    pub image_zoom: Option<i64>,
}

/// Partial update for an existing slide; absent fields are preserved.
/// `id` and `order` are not updatable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlidePatch {
    pub image_url: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
    pub image_fit: Option<ImageFit>,
    pub image_position_x: Option<i64>,
    pub image_position_y: Option<i64>,
    pub image_zoom: Option<i64>,
}

/// Ordered, id-addressable slide collection
#[derive(Debug, Clone, Default)]
pub struct SlideList {
    slides: Vec<Slide>,
}

impl SlideList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild the list from a caller-supplied payload (whole-document PUT).
    ///
    /// Caller `order` values are treated as a sort key only: the list is
    /// stably sorted by them and then reindexed densely, so the stored
    /// document never depends on caller discipline.
    pub fn from_payload(slides: Vec<Slide>) -> Self {
        let mut list = Self { slides };
        list.slides.sort_by_key(|s| s.order);
        list.reindex();
        list
    }

    /// Rehydrate from storage, re-normalizing order defensively.
    pub fn from_stored(slides: Vec<Slide>) -> Self {
        Self::from_payload(slides)
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Append a new slide at the end of the carousel.
    ///
    /// Validates `image_url`, mints a timestamp id, fills display defaults,
    /// and assigns `order = len + 1`.
    pub fn append(&mut self, new: NewSlide) -> StoreResult<Slide> {
        let image_url = match new.image_url {
            Some(url) if !url.trim().is_empty() => url,
            _ => {
                return Err(StoreError::Validation(
                    "image_url is required".to_string(),
                ))
            }
        };

        let slide = Slide {
            id: self.mint_id(),
            image_url,
            order: self.slides.len() as i64 + 1,
            title: new.title.unwrap_or_default(),
            subtitle: new.subtitle.unwrap_or_default(),
            cta_text: new.cta_text.unwrap_or_default(),
            cta_link: new.cta_link.unwrap_or_default(),
            image_fit: new.image_fit.unwrap_or_default(),
            image_position_x: new.image_position_x.unwrap_or_else(default_position),
            image_position_y: new.image_position_y.unwrap_or_else(default_position),
            image_zoom: new.image_zoom.unwrap_or_else(default_zoom),
        };

        self.slides.push(slide.clone());
        Ok(slide)
    }

    /// Merge a partial update into the slide with the given id.
    pub fn update(&mut self, id: &SlideId, patch: SlidePatch) -> StoreResult<Slide> {
        let slide = self
            .slides
            .iter_mut()
            .find(|s| &s.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("Slide {} not found", id)))?;

        if let Some(image_url) = patch.image_url {
            if image_url.trim().is_empty() {
                return Err(StoreError::Validation(
                    "image_url cannot be empty".to_string(),
                ));
            }
            slide.image_url = image_url;
        }
        if let Some(title) = patch.title {
            slide.title = title;
        }
        if let Some(subtitle) = patch.subtitle {
            slide.subtitle = subtitle;
        }
        if let Some(cta_text) = patch.cta_text {
            slide.cta_text = cta_text;
        }
        if let Some(cta_link) = patch.cta_link {
            slide.cta_link = cta_link;
        }
        if let Some(image_fit) = patch.image_fit {
            slide.image_fit = image_fit;
        }
        if let Some(x) = patch.image_position_x {
            slide.image_position_x = x;
        }
        if let Some(y) = patch.image_position_y {
            slide.image_position_y = y;
        }
        if let Some(zoom) = patch.image_zoom {
            slide.image_zoom = zoom;
        }

        Ok(slide.clone())
    }

    /// Remove the slide with the given id and close the ordering gap.
    pub fn remove(&mut self, id: &SlideId) -> StoreResult<()> {
        let before = self.slides.len();
        self.slides.retain(|s| &s.id != id);
        if self.slides.len() == before {
            return Err(StoreError::NotFound(format!("Slide {} not found", id)));
        }
        self.reindex();
        Ok(())
    }

    fn reindex(&mut self) {
        for (index, slide) in self.slides.iter_mut().enumerate() {
            slide.order = index as i64 + 1;
        }
    }

    // Millisecond timestamps can collide when slides are minted in the
    // same instant; bump until the id is free within this document.
    fn mint_id(&self) -> SlideId {
        let mut millis = Utc::now().timestamp_millis();
        loop {
            let candidate = SlideId(millis.to_string());
            if !self.slides.iter().any(|s| s.id == candidate) {
                return candidate;
            }
            millis += 1;
        }
    }
}
