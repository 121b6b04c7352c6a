//! Which form sections are visible.
//!
//! The client has four sections. After login, the user's officer status and
//! the event link decide which of them to reveal:
//!
//! | Mode           | Sections shown                      |
//! |----------------|-------------------------------------|
//! | `OfficerSetup` | park/date picker                    |
//! | `OfficerReady` | class form, admin credit form       |
//! | `PlayerReady`  | class form                          |
//! | none           | nothing                             |

use tracing::debug;

use crate::event_link::EventParams;
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    LoginForm,
    ClassSection,
    ParkDateSelection,
    AdminOptions,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::LoginForm,
        Section::ClassSection,
        Section::ParkDateSelection,
        Section::AdminOptions,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::LoginForm => "Login",
            Section::ClassSection => "Sign In",
            Section::ParkDateSelection => "Event Link",
            Section::AdminOptions => "Credits",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Officer with no event targeted yet: pick a date and share a link
    OfficerSetup,
    /// Officer of the host park: sign in and submit credits
    OfficerReady,
    /// Anyone else with an event targeted: sign in only
    PlayerReady,
}

impl DisplayMode {
    pub fn sections(&self) -> &'static [Section] {
        match self {
            DisplayMode::OfficerSetup => &[Section::ParkDateSelection],
            DisplayMode::OfficerReady => &[Section::ClassSection, Section::AdminOptions],
            DisplayMode::PlayerReady => &[Section::ClassSection],
        }
    }
}

/// Pick the display mode. Rules are checked in order and the first match
/// wins, so an officer without an event targeted always gets the setup view.
pub fn select_display_mode(
    is_officer: bool,
    is_officer_for_this_host_park: bool,
    host_params_present: bool,
) -> Option<DisplayMode> {
    if is_officer && !host_params_present {
        return Some(DisplayMode::OfficerSetup);
    }
    if is_officer_for_this_host_park && host_params_present {
        return Some(DisplayMode::OfficerReady);
    }
    if !is_officer_for_this_host_park && host_params_present {
        return Some(DisplayMode::PlayerReady);
    }
    None
}

/// Visibility flags for the four sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionVisibility {
    login_form: bool,
    class_section: bool,
    park_date_selection: bool,
    admin_options: bool,
}

impl Default for SectionVisibility {
    /// Before login only the login form is shown.
    fn default() -> Self {
        Self {
            login_form: true,
            class_section: false,
            park_date_selection: false,
            admin_options: false,
        }
    }
}

impl SectionVisibility {
    fn flag_mut(&mut self, section: Section) -> &mut bool {
        match section {
            Section::LoginForm => &mut self.login_form,
            Section::ClassSection => &mut self.class_section,
            Section::ParkDateSelection => &mut self.park_date_selection,
            Section::AdminOptions => &mut self.admin_options,
        }
    }

    pub fn is_visible(&self, section: Section) -> bool {
        match section {
            Section::LoginForm => self.login_form,
            Section::ClassSection => self.class_section,
            Section::ParkDateSelection => self.park_date_selection,
            Section::AdminOptions => self.admin_options,
        }
    }

    pub fn show(&mut self, section: Section) {
        *self.flag_mut(section) = true;
    }

    pub fn hide(&mut self, section: Section) {
        *self.flag_mut(section) = false;
    }

    pub fn hide_all(&mut self) {
        for section in Section::ALL {
            self.hide(section);
        }
    }

    /// Visible sections in display order
    pub fn visible(&self) -> Vec<Section> {
        Section::ALL
            .into_iter()
            .filter(|s| self.is_visible(*s))
            .collect()
    }
}

/// Recompute section visibility for the logged-in user and current event
/// link. All sections, including the login form, are hidden first; the
/// selected mode then re-reveals its own.
pub fn manage_display(
    visibility: &mut SectionVisibility,
    session: &Session,
    params: &EventParams,
) -> Option<DisplayMode> {
    let is_officer = session.is_officer();
    let params_present = params.is_populated();
    let is_officer_for_this_park = is_officer
        && session.user_park_id().is_some()
        && session.user_park_id() == params.host_park_id();

    visibility.hide_all();

    let mode = select_display_mode(is_officer, is_officer_for_this_park, params_present);
    debug!(?mode, is_officer, is_officer_for_this_park, params_present, "Display mode selected");

    if let Some(mode) = mode {
        for section in mode.sections() {
            visibility.show(*section);
        }
    }
    mode
}
