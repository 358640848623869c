use sceneforge_render::{Color, DrawCommand, Frame, FrameSink, Stroke};
use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

const LABEL_FONT: &str = "11px -apple-system, system-ui";

/// Paints frames onto a 2D canvas context.
pub struct Canvas2dSink {
    ctx: CanvasRenderingContext2d,
}

impl Canvas2dSink {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    fn set_fill(&self, color: Color) {
        set_style(&self.ctx, "fillStyle", &color.css());
    }

    fn apply_stroke(&self, stroke: Stroke) {
        set_style(&self.ctx, "strokeStyle", &stroke.color.css());
        self.ctx.set_line_width(f64::from(stroke.width));
    }

    fn draw(&self, frame: &Frame, command: &DrawCommand) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        match command {
            DrawCommand::Clear { color } => {
                self.set_fill(*color);
                ctx.fill_rect(0.0, 0.0, f64::from(frame.size.width), f64::from(frame.size.height));
            }
            DrawCommand::Line { from, to, stroke } => {
                self.apply_stroke(*stroke);
                ctx.begin_path();
                ctx.move_to(f64::from(from.x), f64::from(from.y));
                ctx.line_to(f64::from(to.x), f64::from(to.y));
                ctx.stroke();
            }
            DrawCommand::Circle {
                center,
                radius,
                fill,
                outline,
            } => {
                ctx.begin_path();
                ctx.arc(
                    f64::from(center.x),
                    f64::from(center.y),
                    f64::from(*radius),
                    0.0,
                    std::f64::consts::TAU,
                )?;
                self.set_fill(*fill);
                ctx.fill();
                if let Some(stroke) = outline {
                    self.apply_stroke(*stroke);
                    ctx.stroke();
                }
            }
            DrawCommand::Rect {
                center,
                size,
                rotation,
                fill,
                outline,
            } => {
                let s = f64::from(*size);
                ctx.save();
                ctx.translate(f64::from(center.x), f64::from(center.y))?;
                ctx.rotate(f64::from(*rotation))?;
                self.set_fill(*fill);
                ctx.fill_rect(-s / 2.0, -s / 2.0, s, s);
                // Sheen strip down the left edge.
                self.set_fill(Color::WHITE.with_alpha(0.1));
                ctx.fill_rect(-s / 2.0, -s / 2.0, s / 4.0, s);
                if let Some(stroke) = outline {
                    self.apply_stroke(*stroke);
                    ctx.stroke_rect(-s / 2.0, -s / 2.0, s, s);
                }
                ctx.restore();
            }
            DrawCommand::Polygon {
                points,
                fill,
                outline,
            } => {
                let Some((first, rest)) = points.split_first() else {
                    return Ok(());
                };
                ctx.begin_path();
                ctx.move_to(f64::from(first.x), f64::from(first.y));
                for p in rest {
                    ctx.line_to(f64::from(p.x), f64::from(p.y));
                }
                ctx.close_path();
                self.set_fill(*fill);
                ctx.fill();
                if let Some(stroke) = outline {
                    self.apply_stroke(*stroke);
                    ctx.stroke();
                }
            }
            DrawCommand::Label { at, text, color } => {
                self.set_fill(*color);
                ctx.set_font(LABEL_FONT);
                ctx.set_text_align("center");
                ctx.fill_text(text, f64::from(at.x), f64::from(at.y))?;
            }
        }
        Ok(())
    }
}

impl FrameSink for Canvas2dSink {
    type Output = Result<(), JsValue>;

    fn present(&mut self, frame: &Frame) -> Result<(), JsValue> {
        for command in &frame.commands {
            self.draw(frame, command)?;
        }
        Ok(())
    }
}

/// Set a string-valued style property without going through the
/// deprecated typed setters.
fn set_style(ctx: &CanvasRenderingContext2d, property: &str, value: &str) {
    let _ = js_sys::Reflect::set(
        ctx.as_ref(),
        &JsValue::from_str(property),
        &JsValue::from_str(value),
    );
}
