//! Painting draw lists with egui

use se_gizmo::{Color, DrawCommand, DrawList};

/// Convert a linear RGBA color
pub fn to_color32(color: Color) -> egui::Color32 {
    egui::Rgba::from_rgba_unmultiplied(color[0], color[1], color[2], color[3]).into()
}

fn to_pos(origin: egui::Pos2, p: glam::Vec2) -> egui::Pos2 {
    egui::pos2(origin.x + p.x, origin.y + p.y)
}

/// Paint every command of `list`, offsetting viewport pixels by `origin`
pub fn paint_draw_list(painter: &egui::Painter, origin: egui::Pos2, list: &DrawList) {
    let mut shapes = Vec::with_capacity(list.len());
    for command in list.iter() {
        match command {
            DrawCommand::Polygon {
                points,
                fill,
                stroke,
            } => {
                let points = points.iter().map(|&p| to_pos(origin, p)).collect();
                let stroke = stroke
                    .map(|s| egui::Stroke::new(s.width, to_color32(s.color)))
                    .unwrap_or(egui::Stroke::NONE);
                shapes.push(egui::Shape::convex_polygon(points, to_color32(*fill), stroke));
            }
            DrawCommand::Polyline {
                points,
                closed,
                stroke,
            } => {
                let points: Vec<_> = points.iter().map(|&p| to_pos(origin, p)).collect();
                let stroke = egui::Stroke::new(stroke.width, to_color32(stroke.color));
                if *closed {
                    shapes.push(egui::Shape::closed_line(points, stroke));
                } else {
                    shapes.push(egui::Shape::line(points, stroke));
                }
            }
            DrawCommand::Text {
                pos,
                text,
                color,
                size,
            } => {
                let shape = painter.fonts(|fonts| {
                    egui::Shape::text(
                        fonts,
                        to_pos(origin, *pos),
                        egui::Align2::CENTER_CENTER,
                        text,
                        egui::FontId::proportional(*size),
                        to_color32(*color),
                    )
                });
                shapes.push(shape);
            }
        }
    }
    painter.extend(shapes);
}
