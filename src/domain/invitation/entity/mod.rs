pub mod team_invitation;
