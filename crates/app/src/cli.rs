//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use csquare_core::{Collection, EventTab};

use crate::viewmodel::Entity;

#[derive(Debug, Parser)]
#[command(name = "csquare", about = "C-Square club site client")]
pub struct Cli {
    /// Config file to use instead of the platform default
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Load every section and show the promotional toast
    Home {
        /// Viewport width in pixels, overrides the config
        #[arg(long)]
        width: Option<u32>,
        /// Keep printing the sections as the carousels advance
        #[arg(long, value_name = "SECS", default_value_t = 0)]
        watch: u64,
    },
    /// List events for a tab
    Events {
        #[arg(value_enum, default_value = "upcoming")]
        tab: TabArg,
    },
    /// Show one record in full
    Detail {
        #[arg(value_enum)]
        kind: DetailKind,
        id: String,
    },
    /// Admin panel
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum AdminAction {
    /// Verify the stored session
    Status,
    Login {
        username: String,
        password: String,
    },
    Logout,
    /// Show every record with its id
    List,
    Delete {
        #[arg(value_enum)]
        collection: EntityArg,
        id: String,
    },
    /// Upload an image and print its hosted URL
    Upload { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TabArg {
    Upcoming,
    Past,
}

impl From<TabArg> for EventTab {
    fn from(tab: TabArg) -> Self {
        match tab {
            TabArg::Upcoming => EventTab::Upcoming,
            TabArg::Past => EventTab::Past,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DetailKind {
    Team,
    Faculty,
    Event,
}

impl From<DetailKind> for Collection {
    fn from(kind: DetailKind) -> Self {
        match kind {
            DetailKind::Team => Collection::Team,
            DetailKind::Faculty => Collection::Faculty,
            DetailKind::Event => Collection::Events,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityArg {
    Events,
    Team,
    Faculty,
    Gallery,
    Toast,
}

impl From<EntityArg> for Entity {
    fn from(arg: EntityArg) -> Self {
        match arg {
            EntityArg::Events => Entity::Event,
            EntityArg::Team => Entity::TeamMember,
            EntityArg::Faculty => Entity::FacultyMember,
            EntityArg::Gallery => Entity::GalleryItem,
            EntityArg::Toast => Entity::Toast,
        }
    }
}
