use glam::Vec2;
use sceneforge_common::ObjectId;
use serde::Serialize;

/// Drawable surface size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

impl SurfaceSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// A surface with no drawable area (not laid out yet, or collapsed).
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// The projection centre.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height.max(1.0)
    }
}

/// Linear RGBA colour, components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color(pub [f32; 4]);

impl Color {
    pub const BACKGROUND: Color = Color::hex(0x0f0f0f);
    pub const GRID: Color = Color::hex(0x303030);
    pub const ACCENT: Color = Color::hex(0x007acc);
    pub const TEAL: Color = Color::hex(0x4ec9b0);
    pub const WHITE: Color = Color::hex(0xffffff);

    /// Opaque colour from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self([
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            1.0,
        ])
    }

    pub const fn with_alpha(self, alpha: f32) -> Self {
        let [r, g, b, _] = self.0;
        Self([r, g, b, alpha])
    }

    /// Scale the RGB channels, keeping alpha.
    pub fn shade(self, factor: f32) -> Self {
        let [r, g, b, a] = self.0;
        let f = factor.clamp(0.0, 1.0);
        Self([r * f, g * f, b * f, a])
    }

    /// CSS `rgba(...)` string for canvas style properties.
    pub fn css(&self) -> String {
        let [r, g, b, a] = self.0;
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u32;
        format!(
            "rgba({},{},{},{})",
            channel(r),
            channel(g),
            channel(b),
            a.clamp(0.0, 1.0)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Color,
    pub width: f32,
}

/// Highlight tier of a painted object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    #[default]
    None,
    /// Pointer is over the object (perspective backend only).
    Hovered,
    Selected,
}

impl Highlight {
    pub fn resolve(id: ObjectId, selected: Option<ObjectId>, hovered: Option<ObjectId>) -> Self {
        if selected == Some(id) {
            Self::Selected
        } else if hovered == Some(id) {
            Self::Hovered
        } else {
            Self::None
        }
    }

    /// Outline drawn around an object in this tier. The two tiers differ in
    /// both colour and width.
    pub fn outline(self, selected_color: Color) -> Option<Stroke> {
        match self {
            Self::None => None,
            Self::Hovered => Some(Stroke {
                color: Color::WHITE.with_alpha(0.45),
                width: 1.5,
            }),
            Self::Selected => Some(Stroke {
                color: selected_color,
                width: 3.0,
            }),
        }
    }
}

/// One primitive in a frame, in surface pixels.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    Clear {
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        stroke: Stroke,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: Color,
        outline: Option<Stroke>,
    },
    /// Square of side `size` rotated by `rotation` radians about its centre.
    Rect {
        center: Vec2,
        size: f32,
        rotation: f32,
        fill: Color,
        outline: Option<Stroke>,
    },
    Polygon {
        points: Vec<Vec2>,
        fill: Color,
        outline: Option<Stroke>,
    },
    Label {
        at: Vec2,
        text: String,
        color: Color,
    },
}

/// An object that received draw commands, in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaintedObject {
    pub id: ObjectId,
    pub highlight: Highlight,
}

/// Everything one render pass produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Frame {
    pub size: SurfaceSize,
    pub commands: Vec<DrawCommand>,
    pub painted: Vec<PaintedObject>,
}

impl Frame {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            commands: Vec::new(),
            painted: Vec::new(),
        }
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    /// Ids in the order they were painted.
    pub fn paint_order(&self) -> Vec<ObjectId> {
        self.painted.iter().map(|p| p.id).collect()
    }

    pub fn highlight_of(&self, id: ObjectId) -> Option<Highlight> {
        self.painted.iter().find(|p| p.id == id).map(|p| p.highlight)
    }
}
