//! Slide discovery and identifier assignment.

use hashbrown::HashSet;

use crate::host::CarouselHost;

/// A slide of the current sequence together with its identifier.
#[derive(Clone, Debug, PartialEq)]
pub struct RegisteredSlide<S> {
    pub handle: S,
    pub id: String,
}

/// Identifier generated for a slide at `position` (0-based) lacking one.
pub fn slide_id_for(prefix: &str, position: usize) -> String {
    format!("{prefix}{}", position + 1)
}

/// Derive the ordered slide sequence, writing an identifier onto every slide
/// that has none. Existing identifiers are kept as they are. A generated
/// identifier that collides with an existing one gets a numeric suffix.
pub fn register_slides<H: CarouselHost>(
    host: &mut H,
    prefix: &str,
) -> Vec<RegisteredSlide<H::Slide>> {
    let handles = host.slides();
    let existing: Vec<Option<String>> = handles
        .iter()
        .map(|s| host.slide_id(s).filter(|id| !id.is_empty()))
        .collect();
    let mut taken: HashSet<String> = existing.iter().flatten().cloned().collect();

    handles
        .into_iter()
        .zip(existing)
        .enumerate()
        .map(|(position, (handle, id))| {
            let id = match id {
                Some(id) => id,
                None => {
                    let base = slide_id_for(prefix, position);
                    let mut id = base.clone();
                    let mut n = 2;
                    while taken.contains(&id) {
                        id = format!("{base}-{n}");
                        n += 1;
                    }
                    host.set_slide_id(&handle, &id);
                    taken.insert(id.clone());
                    id
                }
            };
            RegisteredSlide { handle, id }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryHost;

    #[test]
    fn assigns_position_based_ids() {
        let mut host = MemoryHost::new(100.0)
            .with_slide(100.0)
            .with_slide(100.0)
            .with_slide(100.0);
        let slides = register_slides(&mut host, "carousel-slide-");
        let ids: Vec<_> = slides.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["carousel-slide-1", "carousel-slide-2", "carousel-slide-3"]);
        assert_eq!(
            host.slide_ids(),
            [
                Some("carousel-slide-1"),
                Some("carousel-slide-2"),
                Some("carousel-slide-3")
            ]
        );
    }

    #[test]
    fn keeps_existing_ids() {
        let mut host = MemoryHost::new(100.0)
            .with_named_slide("intro", 100.0)
            .with_slide(100.0);
        let slides = register_slides(&mut host, "carousel-slide-");
        assert_eq!(slides[0].id, "intro");
        assert_eq!(slides[1].id, "carousel-slide-2");
    }

    #[test]
    fn never_regenerates_after_reorder() {
        let mut host = MemoryHost::new(100.0).with_slide(100.0).with_slide(100.0);
        register_slides(&mut host, "s-");
        host.remove_slide(0);
        let slides = register_slides(&mut host, "s-");
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].id, "s-2");
    }

    #[test]
    fn generated_ids_avoid_collisions() {
        let mut host = MemoryHost::new(100.0)
            .with_named_slide("s-2", 100.0)
            .with_slide(100.0);
        let slides = register_slides(&mut host, "s-");
        assert_eq!(slides[0].id, "s-2");
        assert_eq!(slides[1].id, "s-2-2");
    }

    #[test]
    fn empty_track_yields_empty_sequence() {
        let mut host = MemoryHost::new(100.0);
        assert!(register_slides(&mut host, "s-").is_empty());
    }
}
