mod cropper;
mod dialogs;
mod icons;
mod navigation;
mod preview;
mod status;

pub(super) use dialogs::make_open_dialog;
