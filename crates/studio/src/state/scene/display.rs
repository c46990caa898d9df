//! Display helper functions for objects and shapes

use shared::{SceneObject, ShapeType};

/// Get display name for an object
pub fn object_display_name(object: &SceneObject) -> String {
    format!("{} ({})", shape_display_name(&object.kind), short_id(&object.id))
}

/// Human readable shape name
pub fn shape_display_name(kind: &ShapeType) -> String {
    match kind {
        ShapeType::Cube => "Cube".to_string(),
        ShapeType::Sphere => "Sphere".to_string(),
        ShapeType::Cylinder => "Cylinder".to_string(),
        ShapeType::Cone => "Cone".to_string(),
        ShapeType::Torus => "Torus".to_string(),
        ShapeType::Plane => "Plane".to_string(),
        ShapeType::Pyramid => "Pyramid".to_string(),
        ShapeType::Octahedron => "Octahedron".to_string(),
        ShapeType::Tetrahedron => "Tetrahedron".to_string(),
        ShapeType::GripHandle => "Grip Handle".to_string(),
        ShapeType::ButtonLarge => "Large Button".to_string(),
        ShapeType::Ramp => "Ramp".to_string(),
        ShapeType::Lever => "Lever".to_string(),
        ShapeType::Other(tag) => format!("Unknown ({tag})"),
    }
}

/// Get icon for a shape
pub fn shape_icon(kind: &ShapeType) -> &'static str {
    match kind {
        ShapeType::Cube => "[C]",
        ShapeType::Sphere => "[S]",
        ShapeType::Cylinder => "[Y]",
        ShapeType::Cone => "[K]",
        ShapeType::Torus => "[O]",
        ShapeType::Plane => "[_]",
        ShapeType::Pyramid => "[^]",
        ShapeType::Octahedron => "[8]",
        ShapeType::Tetrahedron => "[4]",
        ShapeType::GripHandle => "[H]",
        ShapeType::ButtonLarge => "[B]",
        ShapeType::Ramp => "[/]",
        ShapeType::Lever => "[L]",
        ShapeType::Other(_) => "[?]",
    }
}

/// Get shortened ID (first 8 characters)
pub fn short_id(id: &str) -> &str {
    match id.char_indices().nth(8) {
        Some((end, _)) => &id[..end],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        let obj = SceneObject::with_id("0123456789abcdef", ShapeType::GripHandle);
        assert_eq!(object_display_name(&obj), "Grip Handle (01234567)");
        assert_eq!(short_id("abc"), "abc");
        assert_eq!(shape_icon(&ShapeType::Other("gear".into())), "[?]");
    }
}
