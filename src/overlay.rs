use crate::analysis::{AnalysisFrame, BoundingBox};

/// Mapped boxes smaller than this on either axis are suppressed as noise
pub const MIN_BOX_PIXELS: f64 = 5.0;

/// Label background height, including padding around the text
pub const LABEL_HEIGHT: f64 = 18.0;

/// Horizontal padding inside the label background
pub const LABEL_PADDING: f64 = 4.0;

/// Classes drawn with the highlight color
const CRITICAL_CLASSES: &[&str] = &["person", "car", "motorcycle", "bus", "truck"];

/// Classes drawn with the navigation color
const NAVIGATION_CLASSES: &[&str] = &["bicycle", "traffic light", "stop sign"];

/// Draw color bucket for a detection class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxStyle {
    Critical,
    Navigation,
    Default,
}

impl BoxStyle {
    pub fn for_class(class: &str) -> Self {
        if CRITICAL_CLASSES.contains(&class) {
            Self::Critical
        } else if NAVIGATION_CLASSES.contains(&class) {
            Self::Navigation
        } else {
            Self::Default
        }
    }
}

/// The rectangle the video actually occupies inside its container under
/// aspect-preserving "contain" fitting, plus the detector-to-screen scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderedRect {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl RenderedRect {
    /// Compute the letterboxed rectangle for a video of natural size
    /// (`video_w`, `video_h`) centered in a container of (`container_w`,
    /// `container_h`). The constraining axis binds; the other axis gets the
    /// letterbox bars.
    pub fn contain(video_w: f64, video_h: f64, container_w: f64, container_h: f64) -> Self {
        let video_aspect = video_w / video_h;
        let container_aspect = container_w / container_h;

        let (width, height, offset_x, offset_y) = if video_aspect > container_aspect {
            // Video is wider than the container: width binds, bars top/bottom
            let width = container_w;
            let height = width / video_aspect;
            (width, height, 0.0, (container_h - height) / 2.0)
        } else {
            // Height binds, bars left/right
            let height = container_h;
            let width = height * video_aspect;
            (width, height, (container_w - width) / 2.0, 0.0)
        };

        Self {
            offset_x,
            offset_y,
            width,
            height,
            scale_x: width / video_w,
            scale_y: height / video_h,
        }
    }

    /// Map a detector-space box into screen coordinates
    pub fn map(&self, bbox: &BoundingBox) -> ScreenRect {
        ScreenRect {
            x1: self.offset_x + bbox.x1 * self.scale_x,
            y1: self.offset_y + bbox.y1 * self.scale_y,
            x2: self.offset_x + bbox.x2 * self.scale_x,
            y2: self.offset_y + bbox.y2 * self.scale_y,
        }
    }
}

/// A box in screen (container) coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl ScreenRect {
    pub fn width(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f64 {
        self.y2 - self.y1
    }
}

/// One drawing instruction for the overlay surface
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Outline a detection box
    Box { rect: ScreenRect, style: BoxStyle },
    /// Opaque label background with text, anchored above its box
    Label {
        text: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        style: BoxStyle,
    },
}

/// Rough text width for surfaces that cannot measure; assumes a fixed-pitch
/// 8 px glyph
pub fn approx_text_width(text: &str) -> f64 {
    text.chars().count() as f64 * 8.0
}

/// Composites one analysis frame into draw commands for a given geometry
///
/// The scene must be fully recomputed whenever the current frame changes or
/// the container is resized, since offsets and scales depend on container
/// geometry.
pub fn compose<F>(frame: &AnalysisFrame, geometry: &RenderedRect, measure: F) -> Vec<DrawCommand>
where
    F: Fn(&str) -> f64,
{
    let mut commands = Vec::with_capacity(frame.detected_objects.len() * 2);

    for object in &frame.detected_objects {
        let rect = geometry.map(&object.bbox);
        if rect.width() < MIN_BOX_PIXELS || rect.height() < MIN_BOX_PIXELS {
            continue;
        }

        let style = BoxStyle::for_class(&object.class);
        commands.push(DrawCommand::Box { rect, style });

        let text = format!("{} {:.0}%", object.class, object.confidence * 100.0);
        let width = measure(&text) + 2.0 * LABEL_PADDING;
        // Anchor immediately above the box, clamped so the label never
        // crosses the canvas top edge
        let y = (rect.y1 - LABEL_HEIGHT).max(0.0);

        commands.push(DrawCommand::Label {
            text,
            x: rect.x1,
            y,
            width,
            height: LABEL_HEIGHT,
            style,
        });
    }

    commands
}
