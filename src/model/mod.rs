mod_use::mod_use![file, media, notification, torrent];
