//! Page layout options for the image converter

use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
    /// Each page takes the size of its image
    Fit,
}

impl PageSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageSize::A4 => "A4",
            PageSize::Letter => "Letter",
            PageSize::Legal => "Legal",
            PageSize::Fit => "fit",
        }
    }
}

impl FromStr for PageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a4" => Ok(PageSize::A4),
            "letter" => Ok(PageSize::Letter),
            "legal" => Ok(PageSize::Legal),
            "fit" => Ok(PageSize::Fit),
            _ => Err(format!("Unknown page size: {} (A4, Letter, Legal, fit)", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

impl FromStr for Orientation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "portrait" => Ok(Orientation::Portrait),
            "landscape" => Ok(Orientation::Landscape),
            _ => Err(format!("Unknown orientation: {} (portrait, landscape)", s)),
        }
    }
}

/// Page margins, presets or explicit values in millimetres
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Margins {
    None,
    Small,
    #[default]
    Medium,
    Large,
    Custom {
        top: u32,
        bottom: u32,
        left: u32,
        right: u32,
    },
}

impl Margins {
    pub fn as_str(&self) -> &'static str {
        match self {
            Margins::None => "none",
            Margins::Small => "small",
            Margins::Medium => "medium",
            Margins::Large => "large",
            Margins::Custom { .. } => "custom",
        }
    }
}

/// A preset name, or `top,bottom,left,right`
impl FromStr for Margins {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => return Ok(Margins::None),
            "small" => return Ok(Margins::Small),
            "medium" => return Ok(Margins::Medium),
            "large" => return Ok(Margins::Large),
            _ => {}
        }

        let values = s
            .split(',')
            .map(|v| v.trim().parse::<u32>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| format!("Invalid margins: {}", s))?;

        match values[..] {
            [top, bottom, left, right] => Ok(Margins::Custom {
                top,
                bottom,
                left,
                right,
            }),
            _ => Err(format!(
                "Invalid margins: {} (none, small, medium, large or top,bottom,left,right)",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageFit {
    /// Scale to fit inside the margins, keeping the aspect ratio
    #[default]
    Fit,
    /// Scale to cover the printable area, cropping the overflow
    Fill,
    /// Original size, centred and clipped to the printable area
    Center,
}

impl ImageFit {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageFit::Fit => "fit",
            ImageFit::Fill => "fill",
            ImageFit::Center => "center",
        }
    }
}

impl FromStr for ImageFit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fit" => Ok(ImageFit::Fit),
            "fill" => Ok(ImageFit::Fill),
            "center" => Ok(ImageFit::Center),
            _ => Err(format!("Unknown image fit: {} (fit, fill, center)", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImageLayout {
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub margins: Margins,
    pub image_fit: ImageFit,
}

impl fmt::Display for ImageLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}, {} margins, {}",
            self.page_size.as_str(),
            self.orientation.as_str(),
            self.margins.as_str(),
            self.image_fit.as_str()
        )
    }
}
