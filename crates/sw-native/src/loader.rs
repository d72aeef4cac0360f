//! # Library Loader
//!
//! Finds the platform's Steamworks library, opens it with `libloading` and
//! resolves every export the binding uses up front. A missing export is
//! reported once, at load time, instead of on first use.

use libloading::Library;
use std::env;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::NativeConfig;
use crate::errors::NativeError;
use crate::ffi::{self, symbols};

/// File name of the library on the target platform.
pub fn library_file_name() -> &'static str {
    if cfg!(target_os = "windows") {
        if cfg!(target_pointer_width = "64") {
            "steam_api64.dll"
        } else {
            "steam_api.dll"
        }
    } else if cfg!(target_os = "macos") {
        "libsteam_api.dylib"
    } else {
        "libsteam_api.so"
    }
}

/// Library path candidates, most specific first.
///
/// An explicit path wins outright. Otherwise the platform file name is looked
/// for next to the executable, then in the current directory.
pub fn candidate_paths(config: &NativeConfig) -> Vec<PathBuf> {
    if let Some(path) = &config.library_path {
        return vec![path.clone()];
    }

    let name = library_file_name();
    let mut candidates = Vec::with_capacity(2);
    if let Some(dir) = env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf)) {
        candidates.push(dir.join(name));
    }
    if let Ok(dir) = env::current_dir() {
        let path = dir.join(name);
        if !candidates.contains(&path) {
            candidates.push(path);
        }
    }
    candidates
}

/// First candidate that exists on disk.
pub fn locate_library(config: &NativeConfig) -> Result<PathBuf, NativeError> {
    let searched = candidate_paths(config);
    match searched.iter().find(|path| path.is_file()) {
        Some(path) => Ok(path.clone()),
        None => Err(NativeError::LibraryNotFound { searched }),
    }
}

macro_rules! api_table {
    ($($field:ident: $ty:ty = $symbol:expr,)*) => {
        /// Resolved function pointers of the flat API.
        ///
        /// The pointers stay valid for as long as the table lives because the
        /// table owns the [`Library`].
        pub struct SteamApi {
            path: PathBuf,
            $(pub(crate) $field: $ty,)*
            _library: Library,
        }

        impl SteamApi {
            /// Open the library at `path` and resolve every export.
            pub fn load(path: &Path) -> Result<Self, NativeError> {
                // SAFETY: loading runs the library's initializers. The
                // Steamworks library has no initializer side effects beyond
                // its own state.
                let library = unsafe { Library::new(path) }.map_err(|source| {
                    NativeError::LoadFailed {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;

                // SAFETY: every type alias matches the export's C declaration.
                let api = unsafe {
                    SteamApi {
                        path: path.to_path_buf(),
                        $($field: resolve::<$ty>(&library, $symbol)?,)*
                        _library: library,
                    }
                };

                info!(path = %path.display(), "Loaded Steamworks library");
                Ok(api)
            }
        }
    };
}

api_table! {
    restart_app_if_necessary: ffi::RestartAppIfNecessary_t = symbols::RESTART_APP_IF_NECESSARY,
    init_flat: ffi::InitFlat_t = symbols::INIT_FLAT,
    run_callbacks: ffi::RunCallbacks_t = symbols::RUN_CALLBACKS,
    shutdown: ffi::Shutdown_t = symbols::SHUTDOWN,

    steam_apps: ffi::InterfaceAccessor_t = symbols::STEAM_APPS,
    apps_get_dlc_data_by_index: ffi::Apps_BGetDLCDataByIndex_t = symbols::APPS_GET_DLC_DATA_BY_INDEX,
    apps_is_dlc_installed: ffi::Apps_BIsDlcInstalled_t = symbols::APPS_IS_DLC_INSTALLED,
    apps_get_app_install_dir: ffi::Apps_GetAppInstallDir_t = symbols::APPS_GET_APP_INSTALL_DIR,
    apps_get_current_game_language: ffi::Apps_GetCurrentGameLanguage_t = symbols::APPS_GET_CURRENT_GAME_LANGUAGE,
    apps_get_dlc_count: ffi::Apps_GetDLCCount_t = symbols::APPS_GET_DLC_COUNT,

    steam_friends: ffi::InterfaceAccessor_t = symbols::STEAM_FRIENDS,
    friends_get_persona_name: ffi::Friends_GetPersonaName_t = symbols::FRIENDS_GET_PERSONA_NAME,
    friends_set_rich_presence: ffi::Friends_SetRichPresence_t = symbols::FRIENDS_SET_RICH_PRESENCE,

    steam_input: ffi::InterfaceAccessor_t = symbols::STEAM_INPUT,
    input_get_connected_controllers: ffi::Input_GetConnectedControllers_t = symbols::INPUT_GET_CONNECTED_CONTROLLERS,
    input_get_input_type_for_handle: ffi::Input_GetInputTypeForHandle_t = symbols::INPUT_GET_INPUT_TYPE_FOR_HANDLE,
    input_init: ffi::Input_Init_t = symbols::INPUT_INIT,
    input_run_frame: ffi::Input_RunFrame_t = symbols::INPUT_RUN_FRAME,

    steam_remote_storage: ffi::InterfaceAccessor_t = symbols::STEAM_REMOTE_STORAGE,
    remote_storage_file_write: ffi::RemoteStorage_FileWrite_t = symbols::REMOTE_STORAGE_FILE_WRITE,
    remote_storage_file_read: ffi::RemoteStorage_FileRead_t = symbols::REMOTE_STORAGE_FILE_READ,
    remote_storage_file_delete: ffi::RemoteStorage_FileDelete_t = symbols::REMOTE_STORAGE_FILE_DELETE,
    remote_storage_get_file_size: ffi::RemoteStorage_GetFileSize_t = symbols::REMOTE_STORAGE_GET_FILE_SIZE,

    steam_user: ffi::InterfaceAccessor_t = symbols::STEAM_USER,
    user_get_steam_id: ffi::User_GetSteamID_t = symbols::USER_GET_STEAM_ID,

    steam_user_stats: ffi::InterfaceAccessor_t = symbols::STEAM_USER_STATS,
    user_stats_get_achievement: ffi::UserStats_GetAchievement_t = symbols::USER_STATS_GET_ACHIEVEMENT,
    user_stats_set_achievement: ffi::UserStats_SetAchievement_t = symbols::USER_STATS_SET_ACHIEVEMENT,
    user_stats_clear_achievement: ffi::UserStats_ClearAchievement_t = symbols::USER_STATS_CLEAR_ACHIEVEMENT,
    user_stats_store_stats: ffi::UserStats_StoreStats_t = symbols::USER_STATS_STORE_STATS,
    user_stats_find_leaderboard: ffi::UserStats_FindLeaderboard_t = symbols::USER_STATS_FIND_LEADERBOARD,
    user_stats_download_leaderboard_entries: ffi::UserStats_DownloadLeaderboardEntries_t = symbols::USER_STATS_DOWNLOAD_LEADERBOARD_ENTRIES,
    user_stats_upload_leaderboard_score: ffi::UserStats_UploadLeaderboardScore_t = symbols::USER_STATS_UPLOAD_LEADERBOARD_SCORE,
    user_stats_get_downloaded_leaderboard_entry: ffi::UserStats_GetDownloadedLeaderboardEntry_t = symbols::USER_STATS_GET_DOWNLOADED_LEADERBOARD_ENTRY,

    steam_utils: ffi::InterfaceAccessor_t = symbols::STEAM_UTILS,
    utils_is_overlay_enabled: ffi::Utils_IsOverlayEnabled_t = symbols::UTILS_IS_OVERLAY_ENABLED,
    utils_is_steam_running_on_steam_deck: ffi::Utils_IsSteamRunningOnSteamDeck_t = symbols::UTILS_IS_STEAM_RUNNING_ON_STEAM_DECK,
    utils_show_floating_gamepad_text_input: ffi::Utils_ShowFloatingGamepadTextInput_t = symbols::UTILS_SHOW_FLOATING_GAMEPAD_TEXT_INPUT,
    utils_get_api_call_result: ffi::Utils_GetAPICallResult_t = symbols::UTILS_GET_API_CALL_RESULT,
    utils_set_warning_message_hook: ffi::Utils_SetWarningMessageHook_t = symbols::UTILS_SET_WARNING_MESSAGE_HOOK,
}

impl SteamApi {
    /// Locate and load the library described by `config`.
    pub fn from_config(config: &NativeConfig) -> Result<Self, NativeError> {
        let path = locate_library(config)?;
        Self::load(&path)
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for SteamApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SteamApi").field("path", &self.path).finish_non_exhaustive()
    }
}

unsafe fn resolve<T: Copy>(library: &Library, symbol: &'static str) -> Result<T, NativeError> {
    let resolved = library
        .get::<T>(symbol.as_bytes())
        .map_err(|source| NativeError::MissingSymbol { symbol, source })?;
    debug!(symbol, "Resolved export");
    Ok(*resolved)
}
