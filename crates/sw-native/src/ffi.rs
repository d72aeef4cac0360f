//! # Flat API Declarations
//!
//! Export names and function-pointer shapes of the Steamworks flat C API.
//! Interface methods take the interface pointer as their first argument.
#![allow(non_camel_case_types)]

use std::ffi::{c_char, c_int, c_void};

/// Opaque interface pointer (`ISteamApps*`, `ISteamUtils*`, ...).
pub type InterfacePtr = *mut c_void;

/// `SteamErrMsg`: fixed buffer `SteamAPI_InitFlat` writes its error text into.
pub type SteamErrMsg = [c_char; STEAM_ERR_MSG_LEN];

pub const STEAM_ERR_MSG_LEN: usize = 1024;

/// `STEAM_INPUT_MAX_COUNT`
pub const STEAM_INPUT_MAX_COUNT: usize = 16;

/// `k_cLeaderboardDetailsMax`
pub const LEADERBOARD_DETAILS_MAX: usize = 64;

/// Buffer size used for strings the native library writes into caller memory.
pub const STRING_BUFFER_LEN: usize = 4096;

/// `SteamAPIWarningMessageHook_t`
pub type WarningMessageHook_t = unsafe extern "C" fn(severity: c_int, text: *const c_char);

// Lifecycle
pub type RestartAppIfNecessary_t = unsafe extern "C" fn(app_id: u32) -> bool;
pub type InitFlat_t = unsafe extern "C" fn(err_msg: *mut SteamErrMsg) -> c_int;
pub type RunCallbacks_t = unsafe extern "C" fn();
pub type Shutdown_t = unsafe extern "C" fn();

/// `SteamAPI_SteamXxx_vNNN()` accessor.
pub type InterfaceAccessor_t = unsafe extern "C" fn() -> InterfacePtr;

// ISteamApps
pub type Apps_BGetDLCDataByIndex_t = unsafe extern "C" fn(
    InterfacePtr,
    dlc_index: c_int,
    app_id: *mut u32,
    available: *mut bool,
    name: *mut c_char,
    name_len: c_int,
) -> bool;
pub type Apps_BIsDlcInstalled_t = unsafe extern "C" fn(InterfacePtr, app_id: u32) -> bool;
pub type Apps_GetAppInstallDir_t =
    unsafe extern "C" fn(InterfacePtr, app_id: u32, folder: *mut c_char, folder_len: u32) -> u32;
pub type Apps_GetCurrentGameLanguage_t = unsafe extern "C" fn(InterfacePtr) -> *const c_char;
pub type Apps_GetDLCCount_t = unsafe extern "C" fn(InterfacePtr) -> c_int;

// ISteamFriends
pub type Friends_GetPersonaName_t = unsafe extern "C" fn(InterfacePtr) -> *const c_char;
pub type Friends_SetRichPresence_t =
    unsafe extern "C" fn(InterfacePtr, key: *const c_char, value: *const c_char) -> bool;

// ISteamInput
pub type Input_GetConnectedControllers_t =
    unsafe extern "C" fn(InterfacePtr, handles_out: *mut u64) -> c_int;
pub type Input_GetInputTypeForHandle_t = unsafe extern "C" fn(InterfacePtr, handle: u64) -> c_int;
pub type Input_Init_t = unsafe extern "C" fn(InterfacePtr, explicitly_call_run_frame: bool) -> bool;
pub type Input_RunFrame_t = unsafe extern "C" fn(InterfacePtr, reserved: bool);

// ISteamRemoteStorage
pub type RemoteStorage_FileWrite_t =
    unsafe extern "C" fn(InterfacePtr, file: *const c_char, data: *const c_void, len: i32) -> bool;
pub type RemoteStorage_FileRead_t =
    unsafe extern "C" fn(InterfacePtr, file: *const c_char, data: *mut c_void, len: i32) -> i32;
pub type RemoteStorage_FileDelete_t = unsafe extern "C" fn(InterfacePtr, file: *const c_char) -> bool;
pub type RemoteStorage_GetFileSize_t = unsafe extern "C" fn(InterfacePtr, file: *const c_char) -> i32;

// ISteamUser
pub type User_GetSteamID_t = unsafe extern "C" fn(InterfacePtr) -> u64;

// ISteamUserStats
pub type UserStats_GetAchievement_t =
    unsafe extern "C" fn(InterfacePtr, name: *const c_char, achieved: *mut bool) -> bool;
pub type UserStats_SetAchievement_t = unsafe extern "C" fn(InterfacePtr, name: *const c_char) -> bool;
pub type UserStats_ClearAchievement_t =
    unsafe extern "C" fn(InterfacePtr, name: *const c_char) -> bool;
pub type UserStats_StoreStats_t = unsafe extern "C" fn(InterfacePtr) -> bool;
pub type UserStats_FindLeaderboard_t = unsafe extern "C" fn(InterfacePtr, name: *const c_char) -> u64;
pub type UserStats_DownloadLeaderboardEntries_t = unsafe extern "C" fn(
    InterfacePtr,
    leaderboard: u64,
    request: c_int,
    range_start: c_int,
    range_end: c_int,
) -> u64;
pub type UserStats_UploadLeaderboardScore_t = unsafe extern "C" fn(
    InterfacePtr,
    leaderboard: u64,
    method: c_int,
    score: i32,
    details: *const i32,
    details_count: c_int,
) -> u64;
pub type UserStats_GetDownloadedLeaderboardEntry_t = unsafe extern "C" fn(
    InterfacePtr,
    entries: u64,
    index: c_int,
    entry_out: *mut c_void,
    details_out: *mut i32,
    details_max: c_int,
) -> bool;

// ISteamUtils
pub type Utils_IsOverlayEnabled_t = unsafe extern "C" fn(InterfacePtr) -> bool;
pub type Utils_IsSteamRunningOnSteamDeck_t = unsafe extern "C" fn(InterfacePtr) -> bool;
pub type Utils_ShowFloatingGamepadTextInput_t = unsafe extern "C" fn(
    InterfacePtr,
    mode: c_int,
    x: c_int,
    y: c_int,
    width: c_int,
    height: c_int,
) -> bool;
pub type Utils_GetAPICallResult_t = unsafe extern "C" fn(
    InterfacePtr,
    call: u64,
    callback_out: *mut c_void,
    callback_size: c_int,
    callback_expected: c_int,
    failed: *mut bool,
) -> bool;
pub type Utils_SetWarningMessageHook_t =
    unsafe extern "C" fn(InterfacePtr, hook: Option<WarningMessageHook_t>);

/// Export names.
pub mod symbols {
    pub const RESTART_APP_IF_NECESSARY: &str = "SteamAPI_RestartAppIfNecessary";
    pub const INIT_FLAT: &str = "SteamAPI_InitFlat";
    pub const RUN_CALLBACKS: &str = "SteamAPI_RunCallbacks";
    pub const SHUTDOWN: &str = "SteamAPI_Shutdown";

    pub const STEAM_APPS: &str = "SteamAPI_SteamApps_v008";
    pub const APPS_GET_DLC_DATA_BY_INDEX: &str = "SteamAPI_ISteamApps_BGetDLCDataByIndex";
    pub const APPS_IS_DLC_INSTALLED: &str = "SteamAPI_ISteamApps_BIsDlcInstalled";
    pub const APPS_GET_APP_INSTALL_DIR: &str = "SteamAPI_ISteamApps_GetAppInstallDir";
    pub const APPS_GET_CURRENT_GAME_LANGUAGE: &str = "SteamAPI_ISteamApps_GetCurrentGameLanguage";
    pub const APPS_GET_DLC_COUNT: &str = "SteamAPI_ISteamApps_GetDLCCount";

    pub const STEAM_FRIENDS: &str = "SteamAPI_SteamFriends_v017";
    pub const FRIENDS_GET_PERSONA_NAME: &str = "SteamAPI_ISteamFriends_GetPersonaName";
    pub const FRIENDS_SET_RICH_PRESENCE: &str = "SteamAPI_ISteamFriends_SetRichPresence";

    pub const STEAM_INPUT: &str = "SteamAPI_SteamInput_v006";
    pub const INPUT_GET_CONNECTED_CONTROLLERS: &str = "SteamAPI_ISteamInput_GetConnectedControllers";
    pub const INPUT_GET_INPUT_TYPE_FOR_HANDLE: &str = "SteamAPI_ISteamInput_GetInputTypeForHandle";
    pub const INPUT_INIT: &str = "SteamAPI_ISteamInput_Init";
    pub const INPUT_RUN_FRAME: &str = "SteamAPI_ISteamInput_RunFrame";

    pub const STEAM_REMOTE_STORAGE: &str = "SteamAPI_SteamRemoteStorage_v016";
    pub const REMOTE_STORAGE_FILE_WRITE: &str = "SteamAPI_ISteamRemoteStorage_FileWrite";
    pub const REMOTE_STORAGE_FILE_READ: &str = "SteamAPI_ISteamRemoteStorage_FileRead";
    pub const REMOTE_STORAGE_FILE_DELETE: &str = "SteamAPI_ISteamRemoteStorage_FileDelete";
    pub const REMOTE_STORAGE_GET_FILE_SIZE: &str = "SteamAPI_ISteamRemoteStorage_GetFileSize";

    pub const STEAM_USER: &str = "SteamAPI_SteamUser_v023";
    pub const USER_GET_STEAM_ID: &str = "SteamAPI_ISteamUser_GetSteamID";

    pub const STEAM_USER_STATS: &str = "SteamAPI_SteamUserStats_v012";
    pub const USER_STATS_GET_ACHIEVEMENT: &str = "SteamAPI_ISteamUserStats_GetAchievement";
    pub const USER_STATS_SET_ACHIEVEMENT: &str = "SteamAPI_ISteamUserStats_SetAchievement";
    pub const USER_STATS_CLEAR_ACHIEVEMENT: &str = "SteamAPI_ISteamUserStats_ClearAchievement";
    pub const USER_STATS_STORE_STATS: &str = "SteamAPI_ISteamUserStats_StoreStats";
    pub const USER_STATS_FIND_LEADERBOARD: &str = "SteamAPI_ISteamUserStats_FindLeaderboard";
    pub const USER_STATS_DOWNLOAD_LEADERBOARD_ENTRIES: &str =
        "SteamAPI_ISteamUserStats_DownloadLeaderboardEntries";
    pub const USER_STATS_UPLOAD_LEADERBOARD_SCORE: &str =
        "SteamAPI_ISteamUserStats_UploadLeaderboardScore";
    pub const USER_STATS_GET_DOWNLOADED_LEADERBOARD_ENTRY: &str =
        "SteamAPI_ISteamUserStats_GetDownloadedLeaderboardEntry";

    pub const STEAM_UTILS: &str = "SteamAPI_SteamUtils_v010";
    pub const UTILS_IS_OVERLAY_ENABLED: &str = "SteamAPI_ISteamUtils_IsOverlayEnabled";
    pub const UTILS_IS_STEAM_RUNNING_ON_STEAM_DECK: &str =
        "SteamAPI_ISteamUtils_IsSteamRunningOnSteamDeck";
    pub const UTILS_SHOW_FLOATING_GAMEPAD_TEXT_INPUT: &str =
        "SteamAPI_ISteamUtils_ShowFloatingGamepadTextInput";
    pub const UTILS_GET_API_CALL_RESULT: &str = "SteamAPI_ISteamUtils_GetAPICallResult";
    pub const UTILS_SET_WARNING_MESSAGE_HOOK: &str = "SteamAPI_ISteamUtils_SetWarningMessageHook";
}
