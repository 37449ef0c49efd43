use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Artist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub genres: Vec<String>,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimpleArtist {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub album_type: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub total_tracks: u32,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub uri: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub artists: Vec<SimpleArtist>,
    #[serde(default)]
    pub album: Option<Album>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub public: Option<bool>,
    #[serde(default)]
    pub collaborative: bool,
    #[serde(default)]
    pub snapshot_id: String,
    #[serde(default)]
    pub uri: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatePlaylistRequest<'a> {
    pub name: &'a str,
    pub public: bool,
    pub collaborative: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddTracksRequest<'a> {
    pub uris: &'a [String],
}

/// Version identifier a playlist mutation answers with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotId {
    pub snapshot_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferPlaybackRequest<'a> {
    pub device_ids: [&'a str; 1],
    pub play: bool,
}

/// Resource kind a search is restricted to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum SearchType {
    #[default]
    Track,
    Album,
    Artist,
}

impl SearchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Track => "track",
            SearchType::Album => "album",
            SearchType::Artist => "artist",
        }
    }
}

#[derive(Tabled)]
pub struct ArtistTableRow {
    pub name: String,
    pub genres: String,
    pub id: String,
}

impl From<Artist> for ArtistTableRow {
    fn from(artist: Artist) -> Self {
        Self {
            genres: artist
                .genres
                .iter()
                .take(3)
                .cloned()
                .collect::<Vec<_>>()
                .join(","),
            name: artist.name,
            id: artist.id,
        }
    }
}

#[derive(Tabled)]
pub struct AlbumTableRow {
    pub date: String,
    pub name: String,
    #[tabled(rename = "type")]
    pub kind: String,
    pub artists: String,
}

impl From<Album> for AlbumTableRow {
    fn from(album: Album) -> Self {
        Self {
            artists: join_artists(&album.artists),
            date: album.release_date,
            name: album.name,
            kind: album.album_type,
        }
    }
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub name: String,
    pub artists: String,
    pub album: String,
    pub uri: String,
}

impl From<Track> for TrackTableRow {
    fn from(track: Track) -> Self {
        Self {
            artists: join_artists(&track.artists),
            album: track.album.map(|a| a.name).unwrap_or_default(),
            name: track.name,
            uri: track.uri,
        }
    }
}

fn join_artists(artists: &[SimpleArtist]) -> String {
    artists
        .iter()
        .map(|a| a.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
