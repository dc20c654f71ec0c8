/// Stock image assigned to an opportunity at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderImage {
    pub id: &'static str,
    pub image_url: &'static str,
    pub image_hint: &'static str,
}

pub const PLACEHOLDER_IMAGES: &[PlaceholderImage] = &[
    PlaceholderImage {
        id: "environment-cleanup",
        image_url: "https://picsum.photos/seed/environment-cleanup/600/400",
        image_hint: "beach cleanup",
    },
    PlaceholderImage {
        id: "education-tutoring",
        image_url: "https://picsum.photos/seed/education-tutoring/600/400",
        image_hint: "children reading",
    },
    PlaceholderImage {
        id: "healthcare-clinic",
        image_url: "https://picsum.photos/seed/healthcare-clinic/600/400",
        image_hint: "community clinic",
    },
    PlaceholderImage {
        id: "community-garden",
        image_url: "https://picsum.photos/seed/community-garden/600/400",
        image_hint: "community garden",
    },
    PlaceholderImage {
        id: "animal-shelter",
        image_url: "https://picsum.photos/seed/animal-shelter/600/400",
        image_hint: "shelter dog",
    },
];

/// Picks the image whose id contains the first word of the category
/// ("Community Development" -> "community"). Falls back to the first image.
pub fn placeholder_for(category: &str) -> PlaceholderImage {
    let hint = category
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .to_lowercase();
    PLACEHOLDER_IMAGES
        .iter()
        .find(|img| !hint.is_empty() && img.id.contains(&hint))
        .copied()
        .unwrap_or(PLACEHOLDER_IMAGES[0])
}
