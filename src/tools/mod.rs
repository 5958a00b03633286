// Tools - one module per subcommand

pub mod fix_artwork;
pub mod genre_from_folder;
pub mod move_by_keyword;
pub mod sort_by_genre;
pub mod strip_comment;
pub mod strip_prefix;
