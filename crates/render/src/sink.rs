use std::fmt::Write as _;

use crate::frame::{DrawCommand, Frame};

/// Consumer of built frames. Canvas painters, text dumps and test probes all
/// implement this; none of them can reach the scene.
pub trait FrameSink {
    /// What presenting a frame produces.
    type Output;

    fn present(&mut self, frame: &Frame) -> Self::Output;
}

/// Human-readable frame dump for the CLI and logs.
#[derive(Debug, Default)]
pub struct TextSink {
    /// Include every draw command, not only the painted objects.
    pub verbose: bool,
}

impl TextSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn verbose() -> Self {
        Self { verbose: true }
    }
}

impl FrameSink for TextSink {
    type Output = String;

    fn present(&mut self, frame: &Frame) -> String {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== Frame {}x{} ({} commands, {} objects) ===",
            frame.size.width,
            frame.size.height,
            frame.commands.len(),
            frame.painted.len()
        );
        for (i, painted) in frame.painted.iter().enumerate() {
            let _ = writeln!(out, "  #{i} [{}] {:?}", painted.id.short(), painted.highlight);
        }
        if self.verbose {
            for command in &frame.commands {
                let _ = writeln!(out, "    {}", describe(command));
            }
        }
        out
    }
}

fn describe(command: &DrawCommand) -> String {
    match command {
        DrawCommand::Clear { color } => format!("clear {}", color.css()),
        DrawCommand::Line { from, to, stroke } => format!(
            "line ({:.1}, {:.1}) -> ({:.1}, {:.1}) w={}",
            from.x, from.y, to.x, to.y, stroke.width
        ),
        DrawCommand::Circle { center, radius, .. } => {
            format!("circle ({:.1}, {:.1}) r={radius:.1}", center.x, center.y)
        }
        DrawCommand::Rect {
            center,
            size,
            rotation,
            ..
        } => format!(
            "rect ({:.1}, {:.1}) size={size:.1} rot={:.1}deg",
            center.x,
            center.y,
            rotation.to_degrees()
        ),
        DrawCommand::Polygon { points, .. } => format!("polygon {} points", points.len()),
        DrawCommand::Label { at, text, .. } => {
            format!("label {text:?} at ({:.1}, {:.1})", at.x, at.y)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OrthoBackend, SurfaceSize, ViewportBackend, ViewportConfig};
    use sceneforge_common::ObjectKind;
    use sceneforge_kernel::Scene;

    #[test]
    fn empty_frame_header() {
        let frame = Frame::new(SurfaceSize::new(320.0, 240.0));
        let out = TextSink::new().present(&frame);
        assert!(out.contains("Frame 320x240"));
        assert!(out.contains("0 objects"));
    }

    #[test]
    fn lists_painted_objects_and_commands() {
        let mut scene = Scene::new();
        let cube = scene.add(ObjectKind::Cube);
        let backend = OrthoBackend::new(ViewportConfig::default());
        let frame = backend.render(&scene, Some(cube.id), SurfaceSize::new(800.0, 600.0));

        let brief = TextSink::new().present(&frame);
        assert!(brief.contains(&cube.id.short()));
        assert!(brief.contains("Selected"));
        assert!(!brief.contains("rect"));

        let full = TextSink::verbose().present(&frame);
        assert!(full.contains("rect (400.0, 300.0) size=60.0"));
        assert!(full.contains("label \"Cube 0\""));
    }
}
