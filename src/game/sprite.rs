//! The actor glyph and the hit box derived from it.
//!
//! The actor is two rows tall. Its anchor row is the lower one (the body),
//! and the head sits one row above:
//!
//! ```text
//!   __(o>     row - 1
//!   \__/      row
//! ```

use unicode_width::UnicodeWidthStr;

/// Glyph rows for the actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    /// Head row while alive.
    pub head: &'static str,
    /// Head row after a collision.
    pub head_hit: &'static str,
    /// Body row (the anchor row).
    pub body: &'static str,
}

impl Default for Sprite {
    fn default() -> Self {
        Self {
            head: "__(o>",
            head_hit: "__(x>",
            body: "\\__/",
        }
    }
}

impl Sprite {
    /// Display width of the widest row.
    pub fn width(&self) -> u16 {
        let widest = [self.head, self.head_hit, self.body]
            .iter()
            .map(|row| row.width())
            .max()
            .unwrap_or(0);
        u16::try_from(widest).unwrap_or(u16::MAX)
    }

    /// Head row for the given liveness.
    #[inline]
    pub const fn head_for(&self, hit: bool) -> &'static str {
        if hit {
            self.head_hit
        } else {
            self.head
        }
    }

    /// Hit box matching this glyph.
    pub fn hitbox(&self) -> Hitbox {
        Hitbox {
            rows: [-1, 0],
            columns: [0, self.head.width()],
        }
    }
}

/// Cells sampled for collision, relative to the actor's row and column.
///
/// Samples the leading column and the first column past the head, on both
/// glyph rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hitbox {
    /// Row offsets from the anchor row.
    pub rows: [i32; 2],
    /// Column offsets from the entity column.
    pub columns: [usize; 2],
}

impl Hitbox {
    /// Absolute `(row, column)` sample sites, skipping rows above the field.
    pub fn sites(&self, row: u16, column: u16) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().flat_map(move |&dr| {
            let r = i32::from(row) + dr;
            self.columns
                .iter()
                .filter(move |_| r >= 0)
                .map(move |&dc| (r as usize, usize::from(column) + dc))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sprite_width() {
        assert_eq!(Sprite::default().width(), 5);
    }

    #[test]
    fn test_hitbox_follows_head_width() {
        let hitbox = Sprite::default().hitbox();
        assert_eq!(hitbox.columns, [0, 5]);
        assert_eq!(hitbox.rows, [-1, 0]);

        let wide = Sprite {
            head: "___(o>",
            head_hit: "___(x>",
            body: "\\___/",
        };
        assert_eq!(wide.hitbox().columns, [0, 6]);
    }

    #[test]
    fn test_sites() {
        let hitbox = Sprite::default().hitbox();
        let sites: Vec<_> = hitbox.sites(25, 40).collect();
        assert_eq!(sites, vec![(24, 40), (24, 45), (25, 40), (25, 45)]);
    }

    #[test]
    fn test_sites_clip_above_field() {
        let hitbox = Sprite::default().hitbox();
        let sites: Vec<_> = hitbox.sites(0, 40).collect();
        assert_eq!(sites, vec![(0, 40), (0, 45)]);
    }

    #[test]
    fn test_head_for() {
        let sprite = Sprite::default();
        assert_eq!(sprite.head_for(false), "__(o>");
        assert_eq!(sprite.head_for(true), "__(x>");
    }
}
