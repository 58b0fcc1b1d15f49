mod economy;
mod leveling;
mod moderation;
mod settings;
mod trade;
