mod cards;
mod economy;
mod guild_settings;
mod level;
mod moderation;
