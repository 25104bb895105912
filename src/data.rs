pub mod osm;
pub mod road;
