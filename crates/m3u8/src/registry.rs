use std::{collections::HashMap, fmt, sync::LazyLock};

use crate::{parser::ParserState, tags};

/// Consumes the value of a tag, i.e. everything after the first `:` with
/// surrounding whitespace removed, and updates the parser state.
pub type TagHandler = fn(&mut ParserState, &str);

pub(crate) static DEFAULT_REGISTRY: LazyLock<TagRegistry> = LazyLock::new(TagRegistry::default);

/// Mapping from tag name (without the leading `#`) to its handler.
///
/// Tags without a handler are ignored by the parser. Use [`TagRegistry::default`]
/// for the built-in tag set and register additional handlers to support vendor
/// tags, or [`TagRegistry::empty`] to start from scratch.
#[derive(Clone)]
pub struct TagRegistry {
    handlers: HashMap<&'static str, TagHandler>,
}

impl TagRegistry {
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// Registers `handler` for `tag`, returning the handler it replaced.
    pub fn register(&mut self, tag: &'static str, handler: TagHandler) -> Option<TagHandler> {
        self.handlers.insert(tag, handler)
    }

    pub fn with(mut self, tag: &'static str, handler: TagHandler) -> Self {
        self.register(tag, handler);
        self
    }

    pub fn unregister(&mut self, tag: &str) -> Option<TagHandler> {
        self.handlers.remove(tag)
    }

    pub fn get(&self, tag: &str) -> Option<TagHandler> {
        self.handlers.get(tag).copied()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.handlers.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.handlers.keys().copied()
    }
}

impl Default for TagRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();

        // 4.3.1 Basic Tags
        registry.register("EXT-X-VERSION", tags::ext_x_version);

        // 4.3.2 Media Segment Tags
        registry.register("EXTINF", tags::extinf);
        registry.register("EXT-X-BYTERANGE", tags::ext_x_byterange);
        registry.register("EXT-X-DISCONTINUITY", tags::ext_x_discontinuity);
        registry.register("EXT-X-KEY", tags::ext_x_key);
        registry.register("EXT-X-MAP", tags::ext_x_map);
        registry.register("EXT-X-PROGRAM-DATE-TIME", tags::ext_x_program_date_time);
        registry.register("EXT-X-DATERANGE", tags::ext_x_daterange);

        // 4.3.3 Media Playlist Tags
        registry.register("EXT-X-TARGETDURATION", tags::ext_x_targetduration);
        registry.register("EXT-X-MEDIA-SEQUENCE", tags::ext_x_media_sequence);
        registry.register(
            "EXT-X-DISCONTINUITY-SEQUENCE",
            tags::ext_x_discontinuity_sequence,
        );
        registry.register("EXT-X-ENDLIST", tags::ext_x_endlist);
        registry.register("EXT-X-PLAYLIST-TYPE", tags::ext_x_playlist_type);
        registry.register("EXT-X-I-FRAMES-ONLY", tags::ext_x_i_frames_only);

        // 4.3.4 Master Playlist Tags
        registry.register("EXT-X-MEDIA", tags::ext_x_media);
        registry.register("EXT-X-STREAM-INF", tags::ext_x_stream_inf);
        registry.register("EXT-X-I-FRAME-STREAM-INF", tags::ext_x_i_frame_stream_inf);
        registry.register("EXT-X-SESSION-DATA", tags::ignore);
        registry.register("EXT-X-SESSION-KEY", tags::ignore);

        // 4.3.5 Media or Master Playlist Tags
        registry.register("EXT-X-INDEPENDENT-SEGMENTS", tags::ignore);
        registry.register("EXT-X-START", tags::ext_x_start);

        // Removed in version 7
        registry.register("EXT-X-ALLOW-CACHE", tags::ext_x_allow_cache);

        registry
    }
}

impl fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tags: Vec<_> = self.tags().collect();
        tags.sort_unstable();
        f.debug_struct("TagRegistry").field("tags", &tags).finish()
    }
}
